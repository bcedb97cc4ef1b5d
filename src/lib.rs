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

pub mod config;
pub mod error;
pub mod layout;
pub mod render;
pub mod transcript;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "chatfill", about = "Hanging-indent renderer for chat transcripts")]
pub struct Cli {
    /// Transcript file: a JSON array of message entries
    pub transcript: std::path::PathBuf,

    /// View width in columns
    #[arg(long, short, default_value_t = 80)]
    pub width: u16,

    /// Override the indent baseline column
    #[arg(long)]
    pub indent: Option<u16>,

    /// Disable speaker merging
    #[arg(long)]
    pub no_merge: bool,

    /// Merge indicator mode (none, pre, post)
    #[arg(long, value_enum)]
    pub indicator: Option<config::IndicatorMode>,

    /// Nudge the indent width by this many columns after layout
    #[arg(long, allow_hyphen_values = true)]
    pub nudge: Option<i32>,

    /// Append tracing diagnostics to this file
    #[arg(long)]
    pub log_file: Option<std::path::PathBuf>,

    /// Tracing filter directives (overrides RUST_LOG)
    #[arg(long)]
    pub log_filter: Option<String>,
}
