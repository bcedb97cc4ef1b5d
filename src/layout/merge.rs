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

use crate::config::FillConfig;
use crate::transcript::{Message, MessageKind, StyledRun};
use ratatui::style::{Modifier, Style};

/// Glyph marking a merged message where its sender label would be.
pub const MERGE_INDICATOR: char = '\u{00b7}'; // ·

/// Label replacement rendered by pre mode: the glyph plus one trailing space.
#[must_use]
pub fn pre_indicator_text() -> String {
    format!("{MERGE_INDICATOR} ")
}

/// Trailing marker appended by post mode to the previous message's last line.
#[must_use]
pub fn post_indicator_text() -> String {
    format!(" {MERGE_INDICATOR}")
}

#[must_use]
pub fn indicator_style() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

/// Case-insensitive sender equality; surrounding whitespace is ignored.
fn senders_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Decide whether `current` visually continues `prev`.
///
/// Pure decision: the layout engine owns the continuity marker and all
/// document mutation. Returns true only when every condition holds --
/// merging enabled, prior not system-injected, prior not an action,
/// elapsed time under the configured lull, timestamps non-decreasing
/// (out-of-order delivery disables merging), and senders equal.
#[must_use]
pub fn is_continuation(prev: &Message, current: &Message, config: &FillConfig) -> bool {
    if !config.merge {
        return false;
    }
    if prev.ephemeral {
        return false;
    }
    if prev.kind == MessageKind::Action {
        return false;
    }
    if current.timestamp < prev.timestamp {
        return false;
    }
    if current.timestamp - prev.timestamp >= config.merge_max_lull {
        return false;
    }
    senders_match(&prev.sender, &current.sender)
}

/// Append a post-mode indicator to `prev`'s last line. Skipped when the
/// line already carries one, or a timestamp field occupies that position.
pub fn append_post_indicator(prev: &mut Message) -> bool {
    if prev.post_indicator || prev.trailing_stamp {
        return false;
    }
    prev.runs.push(StyledRun::styled(post_indicator_text(), indicator_style()));
    prev.post_indicator = true;
    true
}

/// Remove a previously appended post-mode indicator (repair pass).
pub fn remove_post_indicator(msg: &mut Message) -> bool {
    if !msg.post_indicator {
        return false;
    }
    if msg.runs.last().is_some_and(|run| run.text == post_indicator_text()) {
        msg.runs.pop();
    }
    msg.post_indicator = false;
    true
}
