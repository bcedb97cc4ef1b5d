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

use crate::config::{FillConfig, IndicatorMode, MeasureUnit};
use crate::error::LayoutError;
use crate::layout::{measure, merge};
use crate::transcript::{LayoutMeta, Message, MessageId, MessageKind, Overhang, Transcript};

/// Session-scoped derived state: the shared indent width every laid-out
/// message resolves against, the timestamp margin width, and the
/// speaker-continuity marker.
///
/// Lives exactly as long as the transcript view; mutated only by the layout
/// engine and the nudge operation.
pub struct IndentState {
    width: u16,
    margin: u16,
    pub(crate) last_eligible: Option<MessageId>,
    indicator_cache: Option<u16>,
    merge_autoactivated: bool,
}

impl IndentState {
    fn new(config: &FillConfig) -> Self {
        Self {
            width: config.indent,
            margin: config.margin,
            last_eligible: None,
            indicator_cache: None,
            merge_autoactivated: false,
        }
    }

    /// The shared indent width -- the column message bodies align at.
    #[must_use]
    pub fn indent_width(&self) -> u16 {
        self.width
    }

    /// Width reserved in the margin for timestamp placement.
    #[must_use]
    pub fn margin_width(&self) -> u16 {
        self.margin
    }

    /// The continuity marker: the most recently laid-out message the next
    /// insertion may merge with.
    #[must_use]
    pub fn last_eligible(&self) -> Option<MessageId> {
        self.last_eligible
    }

    /// Measured width of the pre-mode indicator, cached on first use so
    /// repeated merges reuse one measurement. Changing the glyph or the
    /// measurement unit mid-session is not yet supported; the cache is
    /// deliberately never invalidated.
    pub(crate) fn indicator_width(&mut self, unit: MeasureUnit) -> u16 {
        if let Some(w) = self.indicator_cache {
            return w;
        }
        let w = u16::try_from(measure::width_of(&merge::pre_indicator_text(), unit))
            .unwrap_or(u16::MAX);
        self.indicator_cache = Some(w);
        w
    }
}

/// Result of a nudge, for UI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NudgeOutcome {
    /// The signed change actually applied to the indent width.
    pub applied: i32,
    pub indent: u16,
    pub margin: u16,
}

/// The layout session for one transcript view: configuration plus the
/// shared [`IndentState`]. All host-facing operations live here.
pub struct Session {
    pub(crate) config: FillConfig,
    pub(crate) state: IndentState,
    active: bool,
}

impl Session {
    #[must_use]
    pub fn new(config: FillConfig) -> Self {
        let state = IndentState::new(&config);
        Self { config, state, active: true }
    }

    #[must_use]
    pub fn config(&self) -> &FillConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &IndentState {
        &self.state
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Activate or deactivate layout for this view. Operations on an
    /// inactive session are rejected with [`LayoutError::Inactive`].
    pub fn set_active(&mut self, on: bool) {
        self.active = on;
    }

    /// Lay out one newly inserted message. Failures are isolated to that
    /// message; later insertions proceed regardless.
    pub fn on_message_inserted(
        &mut self,
        transcript: &mut Transcript,
        id: MessageId,
    ) -> Result<(), LayoutError> {
        if !self.active {
            return Err(LayoutError::Inactive);
        }
        self.layout_message(transcript, id, None)
    }

    /// Adjust the shared indent and margin widths by `delta` columns, or
    /// reset both to their configured defaults when `delta` is zero.
    ///
    /// Stored layouts reference the shared width symbolically, so the change
    /// is picked up at render time with no per-message rewrite. Frozen
    /// overhang widths are untouched; if label text itself changed width, an
    /// explicit refill pass is needed.
    pub fn nudge(&mut self, delta: i32) -> Result<NudgeOutcome, LayoutError> {
        if !self.active {
            return Err(LayoutError::Inactive);
        }
        let applied = if delta == 0 {
            let applied = i32::from(self.config.indent) - i32::from(self.state.width);
            self.state.width = self.config.indent;
            self.state.margin = self.config.margin;
            applied
        } else {
            let before = self.state.width;
            self.state.width = add_clamped(before, delta);
            self.state.margin = add_clamped(self.state.margin, delta);
            i32::from(self.state.width) - i32::from(before)
        };
        Ok(NudgeOutcome { applied, indent: self.state.width, margin: self.state.margin })
    }

    /// Core per-message layout. `coverage` restricts how many display lines
    /// the metadata covers (used by non-repair refills to carry damaged
    /// coverage through unchanged); `None` covers the whole body.
    pub(crate) fn layout_message(
        &mut self,
        transcript: &mut Transcript,
        id: MessageId,
        coverage: Option<usize>,
    ) -> Result<(), LayoutError> {
        self.ensure_merge_dependency();

        let msg = transcript.get(id).ok_or(LayoutError::UnknownMessage(id))?;
        if !msg.is_visible() {
            // Hidden messages carry no layout and do not move the marker.
            transcript.strip_layout(id);
            return Ok(());
        }

        let unit = self.config.unit;
        let kind = msg.kind;
        let line_count = msg.line_count();
        let covered = coverage.map_or(line_count, |c| c.min(line_count));

        if kind == MessageKind::Datestamp {
            // Session/day boundary: continuity resets, and the overhang is a
            // synthetic one-space probe -- the neutral baseline needs no label.
            self.state.last_eligible = None;
            let meta = LayoutMeta {
                overhang: Overhang::Measured(measure::probe_width(unit)),
                merged: false,
                label_len: 0,
                covered_lines: covered,
            };
            if let Some(m) = transcript.get_mut(id) {
                m.layout = Some(meta);
            }
            return Ok(());
        }

        let label_len = label_end(msg);
        let measured_label = measure::measure(&msg.runs, 0..label_len, unit);
        let continuation = self
            .state
            .last_eligible
            .and_then(|pid| transcript.get(pid))
            .is_some_and(|prev| merge::is_continuation(prev, msg, &self.config));

        let mut merged = false;
        let overhang = if continuation {
            merged = true;
            match self.config.indicator {
                IndicatorMode::Pre => Overhang::Measured(self.state.indicator_width(unit)),
                IndicatorMode::Post => {
                    if let Some(pid) = self.state.last_eligible
                        && let Some(prev) = transcript.get_mut(pid)
                    {
                        merge::append_post_indicator(prev);
                    }
                    Overhang::Inherit
                }
                IndicatorMode::None => Overhang::Inherit,
            }
        } else {
            // A zero-length label is an unlabeled message, not an error.
            Overhang::Measured(measured_label)
        };

        let meta = LayoutMeta { overhang, merged, label_len, covered_lines: covered };
        if let Some(m) = transcript.get_mut(id) {
            m.layout = Some(meta);
        }
        // Every visible non-datestamp message becomes the new marker; the
        // detector re-checks kind and ephemerality against it next time.
        self.state.last_eligible = Some(id);
        Ok(())
    }

    /// A merge indicator requires merging itself to be active. Auto-activate
    /// it and warn once rather than silently doing nothing.
    fn ensure_merge_dependency(&mut self) {
        if self.config.indicator != IndicatorMode::None && !self.config.merge {
            self.config.merge = true;
            if !self.state.merge_autoactivated {
                self.state.merge_autoactivated = true;
                tracing::warn!(
                    "merge indicator configured without speaker merging; enabling merging"
                );
            }
        }
    }
}

fn add_clamped(value: u16, delta: i32) -> u16 {
    let next = i32::from(value).saturating_add(delta);
    u16::try_from(next.max(0)).unwrap_or(u16::MAX)
}

/// Byte length of the sender-label region: the explicit boundary when the
/// message carries one, otherwise the first run of non-whitespace characters
/// at the start of the first line. A message opening with whitespace has no
/// label (length 0).
fn label_end(msg: &Message) -> usize {
    let flat = msg.flat_text();
    let first_line = flat.lines().next().unwrap_or("");
    if let Some(explicit) = msg.label_boundary {
        return explicit.min(first_line.len());
    }
    let mut end = 0;
    for (i, ch) in first_line.char_indices() {
        if ch.is_whitespace() {
            break;
        }
        end = i + ch.len_utf8();
    }
    end
}
