// =====
// TESTS: 9
// =====
//
// Per-message layout flow: speaker merging, continuity boundaries, and
// isolation of per-message failures.

use chatfill::error::LayoutError;
use chatfill::transcript::{Overhang, Transcript};
use pretty_assertions::assert_eq;

use crate::helpers::{action, datestamp, insert, normal, session};

// --- merge correctness ---

#[test]
fn five_seconds_apart_merges() {
    let mut s = session();
    let mut t = Transcript::new();
    insert(&mut s, &mut t, normal("alice", 100, "first"));
    let id = insert(&mut s, &mut t, normal("alice", 105, "second"));
    let meta = t.get(id).unwrap().layout.clone().unwrap();
    assert!(meta.merged);
    assert_eq!(meta.overhang.width(), 0);
}

#[test]
fn twenty_five_hours_apart_does_not_merge() {
    let mut s = session();
    let mut t = Transcript::new();
    insert(&mut s, &mut t, normal("alice", 0, "first"));
    let id = insert(&mut s, &mut t, normal("alice", 25 * 3600, "second"));
    assert!(!t.get(id).unwrap().layout.as_ref().unwrap().merged);
}

#[test]
fn case_differing_senders_merge() {
    let mut s = session();
    let mut t = Transcript::new();
    insert(&mut s, &mut t, normal("Alice", 0, "first"));
    let id = insert(&mut s, &mut t, normal("alice", 5, "second"));
    assert!(t.get(id).unwrap().layout.as_ref().unwrap().merged);
}

#[test]
fn earlier_timestamp_never_merges() {
    let mut s = session();
    let mut t = Transcript::new();
    insert(&mut s, &mut t, normal("alice", 100, "first"));
    // out-of-order delivery: same sender, tiny gap, but going backwards
    let id = insert(&mut s, &mut t, normal("alice", 99, "second"));
    assert!(!t.get(id).unwrap().layout.as_ref().unwrap().merged);
}

// --- continuity boundaries ---

#[test]
fn datestamp_resets_continuity() {
    let mut s = session();
    let mut t = Transcript::new();
    insert(&mut s, &mut t, normal("alice", 0, "before"));
    insert(&mut s, &mut t, datestamp(1));
    let id = insert(&mut s, &mut t, normal("alice", 2, "after"));
    assert!(!t.get(id).unwrap().layout.as_ref().unwrap().merged);
}

#[test]
fn action_breaks_merge_chain() {
    let mut s = session();
    let mut t = Transcript::new();
    insert(&mut s, &mut t, normal("alice", 0, "speech"));
    insert(&mut s, &mut t, action("alice", 1, "waves"));
    // prior message is the action, which is exempt from merging onto
    let id = insert(&mut s, &mut t, normal("alice", 2, "more speech"));
    assert!(!t.get(id).unwrap().layout.as_ref().unwrap().merged);
}

#[test]
fn ephemeral_prior_never_merged_onto() {
    let mut s = session();
    let mut t = Transcript::new();
    insert(&mut s, &mut t, normal("alice", 0, "motd").ephemeral());
    let id = insert(&mut s, &mut t, normal("alice", 1, "hello"));
    assert!(!t.get(id).unwrap().layout.as_ref().unwrap().merged);
}

#[test]
fn hidden_message_does_not_advance_marker() {
    let mut s = session();
    let mut t = Transcript::new();
    insert(&mut s, &mut t, normal("alice", 0, "first"));
    insert(&mut s, &mut t, normal("bob", 1, "filtered").hidden());
    // the hidden message between them is invisible to continuity
    let id = insert(&mut s, &mut t, normal("alice", 2, "second"));
    assert!(t.get(id).unwrap().layout.as_ref().unwrap().merged);
}

// --- failure isolation ---

#[test]
fn layout_failure_does_not_halt_later_insertions() {
    let mut s = session();
    let mut t = Transcript::new();
    assert_eq!(s.on_message_inserted(&mut t, 42), Err(LayoutError::UnknownMessage(42)));
    let id = insert(&mut s, &mut t, normal("alice", 0, "still fine"));
    assert_eq!(
        t.get(id).unwrap().layout.as_ref().unwrap().overhang,
        Overhang::Measured(7)
    );
}
