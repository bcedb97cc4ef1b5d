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

use anyhow::Context as _;
use chatfill::Cli;
use chatfill::config::FillConfig;
use chatfill::error::LayoutError;
use chatfill::layout::Session;
use chatfill::render;
use chatfill::transcript::{Message, MessageKind, StyledRun, Transcript};
use clap::Parser;
use ratatui::style::{Modifier, Style};
use serde::Deserialize;
use std::fs::OpenOptions;
use std::time::Duration;

#[allow(clippy::exit)]
fn main() {
    if let Err(err) = run() {
        if let Some(layout_error) = extract_layout_error(&err) {
            eprintln!("{}", layout_error.user_message());
            std::process::exit(2);
        }
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let raw = std::fs::read_to_string(&cli.transcript)
        .with_context(|| format!("failed to read transcript {}", cli.transcript.display()))?;
    let entries: Vec<Entry> = serde_json::from_str(&raw)
        .with_context(|| format!("malformed transcript {}", cli.transcript.display()))?;

    let mut config = FillConfig::default();
    if let Some(indent) = cli.indent {
        config.indent = indent;
    }
    if cli.no_merge {
        config.merge = false;
    }
    if let Some(mode) = cli.indicator {
        config.indicator = mode;
    }

    let mut session = Session::new(config);
    let mut transcript = Transcript::new();
    for entry in entries {
        let id = transcript.push(entry.into_message());
        if let Err(err) = session.on_message_inserted(&mut transcript, id) {
            // Per-message layout failures never halt later insertions.
            tracing::warn!(message = id, error = %err, "layout failed for inserted message");
        }
    }

    if let Some(delta) = cli.nudge {
        let outcome = session.nudge(delta)?;
        tracing::info!(
            applied = outcome.applied,
            indent = outcome.indent,
            margin = outcome.margin,
            "nudged indent width"
        );
    }

    for line in render::render_transcript(&transcript, &session, cli.width) {
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        println!("{text}");
    }
    Ok(())
}

fn extract_layout_error(err: &anyhow::Error) -> Option<LayoutError> {
    err.chain().find_map(|cause| cause.downcast_ref::<LayoutError>().cloned())
}

fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let Some(path) = cli.log_file.as_ref() else {
        if std::env::var_os("RUST_LOG").is_some() {
            eprintln!(
                "RUST_LOG is set, but tracing is disabled without --log-file <PATH>. \
Use --log-file to enable diagnostics."
            );
        }
        return Ok(());
    };

    let directives = cli
        .log_filter
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_owned());
    let filter = tracing_subscriber::EnvFilter::try_new(directives.as_str())
        .map_err(|e| anyhow::anyhow!("invalid tracing filter `{directives}`: {e}"))?;

    let mut options = OpenOptions::new();
    options.create(true).append(true);
    let file = options
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// One transcript entry as stored on disk. The metadata is already parsed
/// by whatever produced the file; this binary only lays it out.
#[derive(Debug, Deserialize)]
struct Entry {
    sender: String,
    #[serde(default)]
    at_ms: u64,
    #[serde(default)]
    kind: MessageKind,
    text: String,
    #[serde(default)]
    hidden: bool,
}

impl Entry {
    fn into_message(self) -> Message {
        let ts = Duration::from_millis(self.at_ms);
        let msg = match self.kind {
            MessageKind::Datestamp => Message::new("", ts, self.kind).plain(self.text),
            MessageKind::Action => Message::new(self.sender.clone(), ts, self.kind)
                .plain(format!("* {} {}", self.sender, self.text)),
            MessageKind::Notice => {
                let label = format!("-{}-", self.sender);
                let boundary = label.len();
                Message::new(self.sender, ts, self.kind)
                    .run(StyledRun::styled(label, Style::default().add_modifier(Modifier::DIM)))
                    .plain(format!(" {}", self.text))
                    .label_boundary(boundary)
            }
            MessageKind::Normal | MessageKind::Unknown => {
                let label = format!("<{}>", self.sender);
                let boundary = label.len();
                Message::new(self.sender, ts, self.kind)
                    .run(StyledRun::styled(label, Style::default().add_modifier(Modifier::BOLD)))
                    .plain(format!(" {}", self.text))
                    .label_boundary(boundary)
            }
        };
        if self.hidden { msg.hidden() } else { msg }
    }
}
