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

use crate::config::MeasureUnit;
use crate::transcript::StyledRun;
use std::ops::Range;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Rendered width of a text fragment in the active unit.
#[must_use]
pub fn width_of(text: &str, unit: MeasureUnit) -> usize {
    match unit {
        MeasureUnit::Cells => UnicodeWidthStr::width(text),
        MeasureUnit::Chars => text.chars().count(),
    }
}

/// Rendered width of a single character in the active unit.
#[must_use]
pub fn char_width(ch: char, unit: MeasureUnit) -> usize {
    match unit {
        MeasureUnit::Cells => UnicodeWidthChar::width(ch).unwrap_or(0),
        MeasureUnit::Chars => 1,
    }
}

/// Measure the rendered width of a byte range of the flattened run text,
/// excluding invisible runs. Degenerate ranges (empty, reversed, out of
/// bounds, mid-character) measure as zero rather than erroring.
#[must_use]
pub fn measure(runs: &[StyledRun], range: Range<usize>, unit: MeasureUnit) -> u16 {
    if range.start >= range.end {
        return 0;
    }
    let mut offset = 0usize;
    let mut total = 0usize;
    for run in runs {
        let run_start = offset;
        let run_end = offset + run.text.len();
        offset = run_end;
        if run_end <= range.start {
            continue;
        }
        if run_start >= range.end {
            break;
        }
        if run.invisible {
            continue;
        }
        let from = range.start.max(run_start) - run_start;
        let to = range.end.min(run_end) - run_start;
        let Some(slice) = run.text.get(from..to) else {
            continue;
        };
        total += width_of(slice, unit);
    }
    u16::try_from(total).unwrap_or(u16::MAX)
}

/// Width of a synthetic one-space probe -- the neutral indent baseline for
/// messages that carry no label of their own.
#[must_use]
pub fn probe_width(unit: MeasureUnit) -> u16 {
    u16::try_from(width_of(" ", unit)).unwrap_or(1)
}
