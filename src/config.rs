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

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default indent baseline: message bodies align at this column.
pub const DEFAULT_INDENT: u16 = 27;

/// Default width reserved in the margin for timestamp placement.
pub const DEFAULT_MARGIN: u16 = 8;

/// Default maximum lull between messages still eligible for merging.
pub const DEFAULT_MERGE_MAX_LULL: Duration = Duration::from_secs(24 * 60 * 60);

/// How a merged (continuation) message marks its suppressed sender label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorMode {
    /// Blank the label entirely.
    #[default]
    None,
    /// Render a short glyph in place of the label.
    Pre,
    /// Append a trailing glyph to the previous message's last line.
    Post,
}

/// Measurement unit for label widths and wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MeasureUnit {
    /// Rendered display-cell width (wide glyphs count 2, zero-width count 0).
    #[default]
    Cells,
    /// Plain character count fallback.
    Chars,
}

/// Configuration surface for the layout engine.
///
/// This is the only state the engine persists; everything else is derived
/// from the transcript at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillConfig {
    /// Indent baseline column -- the target column message bodies align at.
    pub indent: u16,
    /// Cap on the effective indent for narrow views. `None` means uncapped.
    pub max_indent: Option<u16>,
    /// Width reserved in the margin for timestamp placement.
    pub margin: u16,
    /// Visually merge consecutive messages from the same sender.
    pub merge: bool,
    /// Maximum elapsed time between messages still eligible for merging.
    pub merge_max_lull: Duration,
    /// Merge indicator mode.
    pub indicator: IndicatorMode,
    /// Measurement unit for widths.
    pub unit: MeasureUnit,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            max_indent: None,
            margin: DEFAULT_MARGIN,
            merge: true,
            merge_max_lull: DEFAULT_MERGE_MAX_LULL,
            indicator: IndicatorMode::None,
            unit: MeasureUnit::Cells,
        }
    }
}
