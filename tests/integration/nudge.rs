// =====
// TESTS: 5
// =====
//
// Nudge: relative indent resolution at render time, default reset, and
// precondition rejection.

use chatfill::error::LayoutError;
use chatfill::render::render_transcript;
use chatfill::transcript::Transcript;
use pretty_assertions::assert_eq;
use ratatui::text::Line;

use crate::helpers::{insert, normal, session, snapshot};

fn text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

#[test]
fn nudge_shifts_every_rendered_indent() {
    let mut s = session();
    let mut t = Transcript::new();
    insert(&mut s, &mut t, normal("alice", 0, "hello"));
    insert(&mut s, &mut t, normal("alice", 5, "again"));
    insert(&mut s, &mut t, normal("bob", 10, "hey"));

    let before: Vec<String> = render_transcript(&t, &s, 120).iter().map(|l| text(l)).collect();
    let meta_before = snapshot(&t);
    s.nudge(3).unwrap();
    let after: Vec<String> = render_transcript(&t, &s, 120).iter().map(|l| text(l)).collect();

    // every line moved right by exactly three cells, no message was touched
    for (b, a) in before.iter().zip(&after) {
        assert_eq!(format!("   {b}"), *a);
    }
    assert_eq!(snapshot(&t), meta_before);
}

#[test]
fn nudge_zero_restores_default_and_returns_exact_delta() {
    let mut s = session();
    s.nudge(4).unwrap();
    s.nudge(2).unwrap();
    let out = s.nudge(0).unwrap();
    assert_eq!(out.applied, -6);
    assert_eq!(out.indent, 27);
    assert_eq!(out.margin, 8);
}

#[test]
fn nudge_reports_margin_for_ui_feedback() {
    let mut s = session();
    let out = s.nudge(5).unwrap();
    assert_eq!(out.indent, 32);
    assert_eq!(out.margin, 13);
}

#[test]
fn nudge_saturates_at_zero() {
    let mut s = session();
    let out = s.nudge(-100).unwrap();
    assert_eq!(out.indent, 0);
    assert_eq!(out.applied, -27);
}

#[test]
fn inactive_view_rejects_nudge_and_refill() {
    let mut s = session();
    let mut t = Transcript::new();
    s.set_active(false);
    assert_eq!(s.nudge(1), Err(LayoutError::Inactive));
    assert_eq!(s.refill_range(&mut t, 0..0, false), Err(LayoutError::Inactive));
    s.set_active(true);
    assert!(s.nudge(1).is_ok());
}
