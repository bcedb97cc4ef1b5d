// =====
// TESTS: 9
// =====
//
// Bulk re-layout: idempotence, equivalence with sequential layout, repair
// of damage from reveals and out-of-band edits, cooperative stepping.

use chatfill::config::{FillConfig, IndicatorMode};
use chatfill::layout::{RefillReport, Rejigger, Session, StepResult};
use chatfill::transcript::{Message, MessageKind, StyledRun, Transcript};
use pretty_assertions::assert_eq;
use std::time::Duration;

use crate::helpers::{action, bodies, datestamp, insert, normal, session, snapshot};

/// A transcript with every interesting shape: merges, case-folded senders,
/// a datestamp boundary, an action, a hidden message, and a multi-line body.
fn script() -> Vec<Message> {
    vec![
        normal("alice", 0, "one"),
        normal("Alice", 5, "two"),
        normal("bob", 10, "three"),
        action("bob", 12, "stretches"),
        normal("bob", 14, "four"),
        normal("carol", 20, "filtered").hidden(),
        normal("alice", 30, "five\nwith a second line"),
        datestamp(40),
        normal("alice", 50, "six"),
        normal("alice", 3000, "seven"),
    ]
}

#[test]
fn refill_is_idempotent() {
    let mut s = session();
    let mut t = Transcript::new();
    for msg in script() {
        insert(&mut s, &mut t, msg);
    }
    let end = t.messages().last().unwrap().id + 1;
    s.refill_range(&mut t, 0..end, false).unwrap();
    let first = (snapshot(&t), bodies(&t));
    s.refill_range(&mut t, 0..end, false).unwrap();
    assert_eq!((snapshot(&t), bodies(&t)), first);
}

#[test]
fn bulk_refill_matches_sequential_layout() {
    let mut s1 = session();
    let mut t1 = Transcript::new();
    for msg in script() {
        insert(&mut s1, &mut t1, msg);
    }

    let mut s2 = session();
    let mut t2 = Transcript::new();
    for msg in script() {
        t2.push(msg);
    }
    let end = t2.messages().last().unwrap().id + 1;
    s2.refill_range(&mut t2, 0..end, true).unwrap();

    assert_eq!(snapshot(&t2), snapshot(&t1));
}

#[test]
fn subrange_refill_seeds_continuity_from_preceding_messages() {
    let mut s = session();
    let mut t = Transcript::new();
    insert(&mut s, &mut t, normal("alice", 0, "one"));
    let second = insert(&mut s, &mut t, normal("alice", 5, "two"));
    let before = snapshot(&t);
    // re-laying just the second message must still see the first as its
    // continuity anchor
    s.refill_range(&mut t, second..second + 1, false).unwrap();
    assert_eq!(snapshot(&t), before);
}

#[test]
fn repair_clears_stale_merge_after_reveal() {
    let mut s = session();
    let mut t = Transcript::new();
    insert(&mut s, &mut t, normal("alice", 0, "first"));
    let hidden = insert(&mut s, &mut t, normal("bob", 1, "filtered").hidden());
    let merged = insert(&mut s, &mut t, normal("alice", 2, "second"));
    assert!(t.get(merged).unwrap().layout.as_ref().unwrap().merged);

    t.reveal(hidden);
    s.refill_range(&mut t, 0..merged + 1, true).unwrap();
    // bob now sits between the two alice messages, so the merge is gone
    assert!(!t.get(merged).unwrap().layout.as_ref().unwrap().merged);
    assert!(t.get(hidden).unwrap().layout.is_some());
}

#[test]
fn repair_removes_stale_post_indicator() {
    let cfg = FillConfig { indicator: IndicatorMode::Post, ..FillConfig::default() };
    let mut s = Session::new(cfg);
    let mut t = Transcript::new();
    let first = insert(&mut s, &mut t, normal("alice", 0, "first"));
    let hidden = insert(&mut s, &mut t, normal("bob", 1, "filtered").hidden());
    insert(&mut s, &mut t, normal("alice", 2, "second"));
    assert!(t.get(first).unwrap().post_indicator);

    t.reveal(hidden);
    let end = t.messages().last().unwrap().id + 1;
    s.refill_range(&mut t, 0..end, true).unwrap();
    assert!(!t.get(first).unwrap().post_indicator);
    assert!(!t.get(first).unwrap().flat_text().contains('\u{00b7}'));
}

#[test]
fn repair_extends_coverage_over_boundary_gap() {
    let mut s = session();
    let mut t = Transcript::new();
    let id = insert(&mut s, &mut t, normal("alice", 0, "one line"));
    // out-of-band edit grows the body past the covered boundary
    t.get_mut(id).unwrap().runs.push(StyledRun::plain("\nsurprise second line"));
    assert_eq!(t.get(id).unwrap().layout.as_ref().unwrap().covered_lines, 1);

    s.refill_range(&mut t, id..id + 1, false).unwrap();
    assert_eq!(t.get(id).unwrap().layout.as_ref().unwrap().covered_lines, 1);

    s.refill_range(&mut t, id..id + 1, true).unwrap();
    assert_eq!(t.get(id).unwrap().layout.as_ref().unwrap().covered_lines, 2);
}

#[test]
fn refill_reports_processed_and_skipped() {
    let mut s = session();
    let mut t = Transcript::new();
    insert(&mut s, &mut t, normal("alice", 0, "fine"));
    t.push(Message::new("ghost", Duration::from_secs(1), MessageKind::Normal)); // empty body
    insert(&mut s, &mut t, normal("bob", 2, "also fine"));
    let report = s.refill_range(&mut t, 0..3, true).unwrap();
    assert_eq!(report, RefillReport { processed: 2, skipped: 1 });
}

#[test]
fn abandoned_pass_leaves_every_message_valid() {
    let mut s = session();
    let mut t = Transcript::new();
    for msg in script() {
        insert(&mut s, &mut t, msg);
    }
    let before = snapshot(&t);
    let end = t.messages().last().unwrap().id + 1;

    let mut pass = Rejigger::new(&mut s, &mut t, 0..end, false).unwrap();
    for _ in 0..3 {
        let step = pass.step().unwrap();
        assert_ne!(step.result, StepResult::Skipped);
    }
    drop(pass);

    // processed prefix re-laid, untouched suffix still carries its old
    // metadata -- nothing is left half-stripped
    assert_eq!(snapshot(&t), before);
    for m in t.messages() {
        if m.is_visible() {
            assert!(m.layout.is_some(), "message {} lost its layout", m.id);
        }
    }
}

#[test]
fn progress_callback_reports_each_step() {
    let mut s = session();
    let mut t = Transcript::new();
    for msg in script() {
        insert(&mut s, &mut t, msg);
    }
    let end = t.messages().last().unwrap().id + 1;
    let mut count = 0usize;
    s.refill_range_with(&mut t, 0..end, false, |_| count += 1).unwrap();
    assert_eq!(count, t.len());
}
