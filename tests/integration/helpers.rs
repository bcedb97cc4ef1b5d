use chatfill::config::FillConfig;
use chatfill::layout::Session;
use chatfill::transcript::{LayoutMeta, Message, MessageId, MessageKind, Transcript};
use std::time::Duration;

/// Build a default-config session. No host UI, no clock -- just the engine.
pub fn session() -> Session {
    Session::new(FillConfig::default())
}

pub fn normal(sender: &str, at_secs: u64, body: &str) -> Message {
    Message::new(sender, Duration::from_secs(at_secs), MessageKind::Normal)
        .plain(format!("<{sender}> {body}"))
}

pub fn action(sender: &str, at_secs: u64, body: &str) -> Message {
    Message::new(sender, Duration::from_secs(at_secs), MessageKind::Action)
        .plain(format!("* {sender} {body}"))
}

pub fn datestamp(at_secs: u64) -> Message {
    Message::new("", Duration::from_secs(at_secs), MessageKind::Datestamp)
        .plain("[Wed Aug  5 2026]")
}

/// Push a message and run per-message layout on it, as the host does on
/// every insertion.
pub fn insert(session: &mut Session, transcript: &mut Transcript, msg: Message) -> MessageId {
    let id = transcript.push(msg);
    session.on_message_inserted(transcript, id).unwrap();
    id
}

/// Layout metadata of every message, in insertion order.
pub fn snapshot(transcript: &Transcript) -> Vec<Option<LayoutMeta>> {
    transcript.messages().iter().map(|m| m.layout.clone()).collect()
}

/// Flattened body text of every message (post-mode indicators included).
pub fn bodies(transcript: &Transcript) -> Vec<String> {
    transcript.messages().iter().map(Message::flat_text).collect()
}
