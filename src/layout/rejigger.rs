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

use crate::error::LayoutError;
use crate::layout::engine::Session;
use crate::layout::merge;
use crate::transcript::{MessageId, MessageKind, Transcript};
use std::ops::Range;

/// What happened to one message during a refill step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// Metadata stripped and recomputed.
    Relaid,
    /// Hidden message: metadata stripped, nothing recomputed.
    Hidden,
    /// Structural inconsistency; message left untouched.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub id: MessageId,
    pub result: StepResult,
}

/// Final accounting of a refill pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RefillReport {
    pub processed: usize,
    pub skipped: usize,
}

/// Bulk re-layout over a contiguous message range, driven one message at a
/// time by the host. The host may interleave its own work between steps or
/// abandon the pass entirely; every already-processed message is left fully
/// laid out either way.
///
/// Replays layout in insertion order with the continuity state seeded from
/// the messages preceding the range, so the result is observably identical
/// to sequential per-message layout.
pub struct Rejigger<'s, 't> {
    session: &'s mut Session,
    transcript: &'t mut Transcript,
    cursor: usize,
    end: usize,
    repair: bool,
    report: RefillReport,
}

impl<'s, 't> Rejigger<'s, 't> {
    pub fn new(
        session: &'s mut Session,
        transcript: &'t mut Transcript,
        range: Range<MessageId>,
        repair: bool,
    ) -> Result<Self, LayoutError> {
        if !session.is_active() {
            return Err(LayoutError::Inactive);
        }
        if range.start > range.end {
            return Err(LayoutError::InvalidRange { start: range.start, end: range.end });
        }
        let cursor = transcript.lower_bound(range.start);
        let end = transcript.lower_bound(range.end);
        session.state.last_eligible = seed_continuity(transcript, cursor);
        Ok(Self { session, transcript, cursor, end, repair, report: RefillReport::default() })
    }

    /// Messages not yet processed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.end - self.cursor
    }

    #[must_use]
    pub fn report(&self) -> RefillReport {
        self.report
    }

    pub fn finish(self) -> RefillReport {
        self.report
    }

    /// Process the next message in the range. Returns `None` once the range
    /// is exhausted.
    pub fn step(&mut self) -> Option<StepOutcome> {
        if self.cursor >= self.end {
            return None;
        }
        let i = self.cursor;
        self.cursor += 1;

        let (id, visible, empty_body, has_post) = {
            let m = &self.transcript.messages()[i];
            (m.id, m.is_visible(), m.flat_text().is_empty(), m.post_indicator)
        };

        if !visible {
            self.transcript.strip_layout(id);
            if self.repair
                && has_post
                && let Some(m) = self.transcript.get_mut(id)
            {
                merge::remove_post_indicator(m);
            }
            self.report.processed += 1;
            return Some(StepOutcome { id, result: StepResult::Hidden });
        }

        if empty_body {
            // Third-party edit damage: no terminated line to attach metadata
            // to. Leave the message untouched and keep going.
            tracing::warn!(message = id, "message body has no line to lay out; skipping");
            self.report.skipped += 1;
            return Some(StepOutcome { id, result: StepResult::Skipped });
        }

        // Without repair, damaged coverage is carried through unchanged;
        // repair extends the metadata to the true message boundary.
        let coverage = if self.repair {
            None
        } else {
            self.transcript.get(id).and_then(|m| m.layout.as_ref().map(|l| l.covered_lines))
        };

        if self.repair
            && has_post
            && let Some(m) = self.transcript.get_mut(id)
        {
            // Stale post-mode indicator from a merge that may no longer
            // apply; the successor's re-layout re-appends it if it still does.
            merge::remove_post_indicator(m);
        }

        self.transcript.strip_layout(id);
        match self.session.layout_message(self.transcript, id, coverage) {
            Ok(()) => {
                self.report.processed += 1;
                Some(StepOutcome { id, result: StepResult::Relaid })
            }
            Err(err) => {
                tracing::warn!(message = id, error = %err, "re-layout failed; skipping message");
                self.report.skipped += 1;
                Some(StepOutcome { id, result: StepResult::Skipped })
            }
        }
    }
}

/// Continuity state in effect just before `start_idx`, reconstructed the
/// same way sequential layout would have left it: the nearest preceding
/// visible message, unless a datestamp intervenes.
fn seed_continuity(transcript: &Transcript, start_idx: usize) -> Option<MessageId> {
    for m in transcript.messages()[..start_idx].iter().rev() {
        if !m.is_visible() {
            continue;
        }
        if m.kind == MessageKind::Datestamp {
            return None;
        }
        return Some(m.id);
    }
    None
}

impl Session {
    /// Re-lay an id range in insertion order, invoking `progress` after each
    /// message. Returns the final report; per-message failures accumulate
    /// there instead of aborting the pass.
    pub fn refill_range_with(
        &mut self,
        transcript: &mut Transcript,
        range: Range<MessageId>,
        repair: bool,
        mut progress: impl FnMut(&StepOutcome),
    ) -> Result<RefillReport, LayoutError> {
        let mut pass = Rejigger::new(self, transcript, range, repair)?;
        while let Some(step) = pass.step() {
            progress(&step);
        }
        Ok(pass.finish())
    }

    /// [`Session::refill_range_with`] without a progress callback.
    pub fn refill_range(
        &mut self,
        transcript: &mut Transcript,
        range: Range<MessageId>,
        repair: bool,
    ) -> Result<RefillReport, LayoutError> {
        self.refill_range_with(transcript, range, repair, |_| {})
    }
}
