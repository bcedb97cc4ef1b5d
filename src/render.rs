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

//! Resolves stored layout metadata into display lines.
//!
//! Indents are resolved here, at render time: the first line of a message
//! reserves `indent_width - overhang` cells, every wrapped or subsequent
//! line reserves `indent_width`. This is what makes a nudge of the shared
//! width take effect without touching any message.

use crate::config::MeasureUnit;
use crate::layout::engine::Session;
use crate::layout::{measure, merge};
use crate::transcript::{Message, Overhang, Transcript};
use ratatui::style::Style;
use ratatui::text::{Line, Span};

type Cell = (char, Style);

/// Render every visible message of the transcript in insertion order.
#[must_use]
pub fn render_transcript(
    transcript: &Transcript,
    session: &Session,
    view_width: u16,
) -> Vec<Line<'static>> {
    let mut out = Vec::new();
    for msg in transcript.messages() {
        out.extend(render_message(msg, session, view_width));
    }
    out
}

/// Render one message to wrapped display lines. Hidden messages render
/// nothing; messages without layout metadata render unindented.
#[must_use]
pub fn render_message(msg: &Message, session: &Session, view_width: u16) -> Vec<Line<'static>> {
    if !msg.is_visible() || msg.runs.is_empty() {
        return Vec::new();
    }
    let unit = session.config().unit;
    let width = usize::from(view_width.max(1));
    let indent = effective_indent(session, view_width);

    let Some(meta) = msg.layout.as_ref() else {
        let mut out = Vec::new();
        for cells in visible_cells_lines(msg, 0) {
            for wrapped in wrap_cells(&cells, width, width, unit) {
                out.push(line_from(0, wrapped));
            }
        }
        return out;
    };

    // A merged message blanks its label region: skip the label bytes plus
    // the separating space so the body starts exactly at the indent column.
    let skip = if meta.merged {
        let flat = msg.flat_text();
        let mut skip = meta.label_len;
        if flat.get(skip..).is_some_and(|rest| rest.starts_with(' ')) {
            skip += 1;
        }
        skip
    } else {
        0
    };

    let overhang = usize::from(meta.overhang.width());
    let indicator: Vec<Cell> = if meta.merged && matches!(meta.overhang, Overhang::Measured(_)) {
        merge::pre_indicator_text().chars().map(|c| (c, merge::indicator_style())).collect()
    } else {
        Vec::new()
    };

    let mut out = Vec::new();
    for (i, cells) in visible_cells_lines(msg, skip).iter().enumerate() {
        // Lines past the covered boundary lost their metadata to an
        // out-of-band edit; they render unindented until a repair pass.
        let covered = i < meta.covered_lines;
        let (first_pad, cont_pad) = if !covered {
            (0, 0)
        } else if i == 0 {
            (indent.saturating_sub(overhang), indent)
        } else {
            (indent, indent)
        };

        let composed: Vec<Cell>;
        let cells_ref: &[Cell] = if i == 0 && !indicator.is_empty() {
            composed = indicator.iter().copied().chain(cells.iter().copied()).collect();
            &composed
        } else {
            cells
        };

        let first_avail = width.saturating_sub(first_pad).max(1);
        let cont_avail = width.saturating_sub(cont_pad).max(1);
        for (j, wrapped) in wrap_cells(cells_ref, first_avail, cont_avail, unit).into_iter().enumerate()
        {
            let pad = if j == 0 { first_pad } else { cont_pad };
            out.push(line_from(pad, wrapped));
        }
    }
    out
}

/// The indent width actually used for rendering: the shared width, bounded
/// by the configured cap and the view itself.
fn effective_indent(session: &Session, view_width: u16) -> usize {
    let mut indent = session.state().indent_width();
    if let Some(cap) = session.config().max_indent {
        indent = indent.min(cap);
    }
    usize::from(indent.min(view_width.saturating_sub(1)))
}

/// Split the visible runs into per-source-line cell sequences, dropping the
/// first `skip_bytes` of the flattened text (the blanked label region).
fn visible_cells_lines(msg: &Message, skip_bytes: usize) -> Vec<Vec<Cell>> {
    let mut lines: Vec<Vec<Cell>> = vec![Vec::new()];
    let mut offset = 0usize;
    let mut last_char = None;
    for run in &msg.runs {
        let run_start = offset;
        offset += run.text.len();
        if run.invisible {
            continue;
        }
        for (i, ch) in run.text.char_indices() {
            last_char = Some(ch);
            if ch == '\n' {
                lines.push(Vec::new());
                continue;
            }
            if run_start + i < skip_bytes {
                continue;
            }
            if let Some(last) = lines.last_mut() {
                last.push((ch, run.style));
            }
        }
    }
    // The terminating newline does not open a display line of its own.
    if last_char == Some('\n') && lines.last().is_some_and(Vec::is_empty) {
        lines.pop();
    }
    lines
}

fn cells_width(cells: &[Cell], unit: MeasureUnit) -> usize {
    cells.iter().map(|c| measure::char_width(c.0, unit)).sum()
}

/// Greedy word wrap over styled cells. The first produced line fits
/// `first_avail`, every later line fits `rest_avail`; words wider than a
/// whole line are split at cell boundaries.
fn wrap_cells(
    cells: &[Cell],
    first_avail: usize,
    rest_avail: usize,
    unit: MeasureUnit,
) -> Vec<Vec<Cell>> {
    let first_avail = first_avail.max(1);
    let rest_avail = rest_avail.max(1);
    if cells.is_empty() {
        return vec![Vec::new()];
    }

    let mut lines: Vec<Vec<Cell>> = Vec::new();
    let mut line: Vec<Cell> = Vec::new();
    let mut line_w = 0usize;
    let mut idx = 0usize;

    while idx < cells.len() {
        let is_space = cells[idx].0 == ' ';
        let start = idx;
        while idx < cells.len() && (cells[idx].0 == ' ') == is_space {
            idx += 1;
        }
        let token = &cells[start..idx];
        let token_w = cells_width(token, unit);
        let avail = if lines.is_empty() { first_avail } else { rest_avail };

        if line_w + token_w <= avail {
            line.extend_from_slice(token);
            line_w += token_w;
            continue;
        }

        if is_space {
            // break here; spaces at the break point are dropped
            lines.push(std::mem::take(&mut line));
            line_w = 0;
            continue;
        }

        if !line.is_empty() {
            while line.last().is_some_and(|c| c.0 == ' ') {
                line.pop();
            }
            lines.push(std::mem::take(&mut line));
            line_w = 0;
        }

        // the word opens a fresh line; split it if wider than a whole line
        let mut word = token;
        loop {
            let avail_now = if lines.is_empty() { first_avail } else { rest_avail };
            let word_w = cells_width(word, unit);
            if word_w <= avail_now {
                line.extend_from_slice(word);
                line_w = word_w;
                break;
            }
            let cut = split_point(word, avail_now, unit);
            lines.push(word[..cut].to_vec());
            word = &word[cut..];
        }
    }

    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

/// Largest prefix of `word` fitting `avail` cells, never less than one cell.
fn split_point(word: &[Cell], avail: usize, unit: MeasureUnit) -> usize {
    let mut w = 0usize;
    for (i, cell) in word.iter().enumerate() {
        let cw = measure::char_width(cell.0, unit);
        if w + cw > avail && i > 0 {
            return i;
        }
        w += cw;
    }
    word.len().max(1)
}

/// Assemble one display line: indent padding plus cells regrouped into
/// spans of equal style.
fn line_from(pad: usize, cells: Vec<Cell>) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    if pad > 0 {
        spans.push(Span::raw(" ".repeat(pad)));
    }
    let mut text = String::new();
    let mut style: Option<Style> = None;
    for (ch, st) in cells {
        match style {
            Some(s) if s == st => text.push(ch),
            Some(s) => {
                spans.push(Span::styled(std::mem::take(&mut text), s));
                text.push(ch);
                style = Some(st);
            }
            None => {
                text.push(ch);
                style = Some(st);
            }
        }
    }
    if let Some(s) = style
        && !text.is_empty()
    {
        spans.push(Span::styled(text, s));
    }
    Line::from(spans)
}
