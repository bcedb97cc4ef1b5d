// chatfill — a hanging-indent layout engine for chat transcripts
// Copyright (C) 2026  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use ratatui::style::Style;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Monotonically increasing insertion sequence id, assigned by [`Transcript::push`].
pub type MessageId = u64;

/// Monotonic "current time" accessor used to stamp messages that arrive
/// without a timestamp of their own.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// [`Clock`] backed by [`Instant`], anchored at construction.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Normal,
    Action,
    Notice,
    Datestamp,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// One styled span of message text. Newlines inside `text` delimit display
/// lines. Invisible runs stay in the document but render nothing and are
/// excluded from width measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledRun {
    pub text: String,
    pub style: Style,
    pub invisible: bool,
}

impl StyledRun {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), style: Style::default(), invisible: false }
    }

    #[must_use]
    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self { text: text.into(), style, invisible: false }
    }

    #[must_use]
    pub fn invisible(text: impl Into<String>) -> Self {
        Self { text: text.into(), style: Style::default(), invisible: true }
    }
}

/// Frozen overhang of a laid-out message: the width reserved before its
/// first line for the sender label or merge indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overhang {
    /// Label or indicator width measured and frozen at layout time.
    Measured(u16),
    /// Sentinel: no overhang of its own, the first line indents by the
    /// shared indent width unmodified.
    Inherit,
}

impl Overhang {
    #[must_use]
    pub fn width(self) -> u16 {
        match self {
            Self::Measured(w) => w,
            Self::Inherit => 0,
        }
    }
}

/// Derived layout metadata attached to a message. Indents are deliberately
/// NOT stored here: the first-line indent is resolved at render time as
/// `indent_width - overhang` and the continuation indent as `indent_width`,
/// so a nudge of the shared width needs no per-message rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutMeta {
    pub overhang: Overhang,
    /// Label presentation is blanked (this message continues the previous one).
    pub merged: bool,
    /// Byte length of the label region at the start of the flattened text.
    pub label_len: usize,
    /// How many display lines the metadata covers. Out-of-band edits can
    /// grow the body past this; a repair pass extends the coverage.
    pub covered_lines: usize,
}

/// One logical chat entry spanning one or more wrapped display lines.
///
/// Content is never mutated after layout except for the attached layout
/// metadata and the post-mode merge indicator; messages are never deleted,
/// only hidden.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub sender: String,
    pub timestamp: Duration,
    pub kind: MessageKind,
    pub visibility: Visibility,
    pub runs: Vec<StyledRun>,
    /// System-injected messages never merge onto.
    pub ephemeral: bool,
    /// Explicit sender-label boundary (byte offset into the flattened text).
    /// When absent the engine scans for the first non-whitespace token.
    pub label_boundary: Option<usize>,
    /// A timestamp field already occupies the end of the last line, so a
    /// post-mode merge indicator must not be appended there.
    pub trailing_stamp: bool,
    /// A post-mode merge indicator has been appended to the last line.
    pub post_indicator: bool,
    pub layout: Option<LayoutMeta>,
}

impl Message {
    #[must_use]
    pub fn new(sender: impl Into<String>, timestamp: Duration, kind: MessageKind) -> Self {
        Self {
            id: 0,
            sender: sender.into(),
            timestamp,
            kind,
            visibility: Visibility::Visible,
            runs: Vec::new(),
            ephemeral: false,
            label_boundary: None,
            trailing_stamp: false,
            post_indicator: false,
            layout: None,
        }
    }

    #[must_use]
    pub fn run(mut self, run: StyledRun) -> Self {
        self.runs.push(run);
        self
    }

    #[must_use]
    pub fn plain(self, text: impl Into<String>) -> Self {
        self.run(StyledRun::plain(text))
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visibility = Visibility::Hidden;
        self
    }

    #[must_use]
    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    #[must_use]
    pub fn label_boundary(mut self, end: usize) -> Self {
        self.label_boundary = Some(end);
        self
    }

    #[must_use]
    pub fn trailing_stamp(mut self) -> Self {
        self.trailing_stamp = true;
        self
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    /// Flattened body text across all runs, invisible runs included
    /// (invisibility is presentation, not content).
    #[must_use]
    pub fn flat_text(&self) -> String {
        let mut out = String::with_capacity(self.runs.iter().map(|r| r.text.len()).sum());
        for run in &self.runs {
            out.push_str(&run.text);
        }
        out
    }

    /// Number of display lines in the body. The terminating newline does not
    /// open a new line; an empty body has zero lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        let flat = self.flat_text();
        flat.lines().count()
    }
}

/// The transcript document: an append-only, insertion-ordered sequence of
/// messages, addressed by stable [`MessageId`] rather than by position.
#[derive(Default)]
pub struct Transcript {
    messages: Vec<Message>,
    next_id: MessageId,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message at the tail, assigning the next sequence id.
    /// Returns the assigned id.
    pub fn push(&mut self, mut msg: Message) -> MessageId {
        let id = self.next_id;
        self.next_id += 1;
        msg.id = id;
        self.messages.push(msg);
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Position of a message in insertion order. Ids are strictly
    /// increasing, so this is a binary search.
    #[must_use]
    pub fn index_of(&self, id: MessageId) -> Option<usize> {
        self.messages.binary_search_by_key(&id, |m| m.id).ok()
    }

    #[must_use]
    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.index_of(id).map(|i| &self.messages[i])
    }

    pub fn get_mut(&mut self, id: MessageId) -> Option<&mut Message> {
        let i = self.index_of(id)?;
        Some(&mut self.messages[i])
    }

    /// First index whose message id is >= `id` (range resolution).
    #[must_use]
    pub fn lower_bound(&self, id: MessageId) -> usize {
        self.messages.partition_point(|m| m.id < id)
    }

    /// Remove the layout metadata from a message, if any.
    pub fn strip_layout(&mut self, id: MessageId) {
        if let Some(msg) = self.get_mut(id) {
            msg.layout = None;
        }
    }

    /// Hide a message (filtered content). Returns false if the id is unknown.
    pub fn hide(&mut self, id: MessageId) -> bool {
        match self.get_mut(id) {
            Some(msg) => {
                msg.visibility = Visibility::Hidden;
                true
            }
            None => false,
        }
    }

    /// Reveal a previously hidden message. The caller is expected to follow
    /// up with a repair refill over the surrounding range.
    pub fn reveal(&mut self, id: MessageId) -> bool {
        match self.get_mut(id) {
            Some(msg) => {
                msg.visibility = Visibility::Visible;
                true
            }
            None => false,
        }
    }
}
