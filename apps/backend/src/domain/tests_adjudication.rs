use time::macros::datetime;
use time::Duration;

use crate::domain::adjudication::{
    decide_window, plan_split, split_prize, validate_claim_marks, WindowDecision, WindowEntry,
};
use crate::domain::calls::GameType;
use crate::domain::card::Card;
use crate::domain::cells::{CellSet, FREE_CELL};
use crate::domain::dealing::deal_layout;
use crate::domain::test_gens::history_for;
use crate::errors::domain::{DomainError, ValidationKind};

const WINDOW: Duration = Duration::seconds(10);

fn card() -> Card {
    Card::new(1, 1, deal_layout(GameType::Numbers, 77).unwrap(), CellSet::empty())
}

#[test]
fn claim_marks_backed_by_history_pass() {
    let card = card();
    let called = CellSet::from_indices([0, 4, 20, 24]);
    let history = history_for(card.layout(), called);
    let validated = validate_claim_marks(&card, called, &history).unwrap();
    assert_eq!(validated, called.with(FREE_CELL));
}

#[test]
fn offending_cells_are_listed() {
    let card = card();
    let history = history_for(card.layout(), CellSet::from_indices([0, 4]));
    let asserted = CellSet::from_indices([0, 4, 20, 24]);
    match validate_claim_marks(&card, asserted, &history) {
        Err(DomainError::Validation(ValidationKind::InvalidClaim, detail)) => {
            assert!(detail.contains("[20,24]"), "detail was: {detail}");
        }
        other => panic!("expected InvalidClaim, got {other:?}"),
    }
}

#[test]
fn free_cell_is_never_offending() {
    let card = card();
    let history = history_for(card.layout(), CellSet::empty());
    let validated = validate_claim_marks(&card, CellSet::single(FREE_CELL), &history).unwrap();
    assert_eq!(validated, CellSet::single(FREE_CELL));
}

#[test]
fn first_winner_opens_the_window() {
    let first_call = datetime!(2026-01-01 12:00:00 UTC);
    let now = datetime!(2026-01-01 12:01:00 UTC);
    match decide_window(None, Some(first_call), now, WINDOW) {
        WindowDecision::Opens(w) => {
            assert_eq!(w.start, now);
            assert_eq!(w.end(), now + WINDOW);
        }
        other => panic!("expected Opens, got {other:?}"),
    }
}

#[test]
fn claim_three_seconds_later_joins() {
    let first = datetime!(2026-01-01 12:01:00 UTC);
    let d = decide_window(Some(first), Some(first - Duration::minutes(1)), first + Duration::seconds(3), WINDOW);
    assert!(matches!(d, WindowDecision::Joins(_)));
    assert!(d.accepts());
}

#[test]
fn window_is_half_open_and_never_reopens() {
    let first = datetime!(2026-01-01 12:01:00 UTC);
    let at_end = decide_window(Some(first), None, first + WINDOW, WINDOW);
    assert!(matches!(at_end, WindowDecision::Closed(_)));
    let later = decide_window(Some(first), None, first + Duration::seconds(11), WINDOW);
    assert!(matches!(later, WindowDecision::Closed(_)));
    assert!(!later.accepts());
    let just_before = decide_window(Some(first), None, first + WINDOW - Duration::milliseconds(1), WINDOW);
    assert!(just_before.accepts());
}

#[test]
fn stale_winner_timestamp_is_clamped_to_first_call() {
    // A winner timestamp older than the current game's first call cannot
    // anchor the window.
    let stale = datetime!(2026-01-01 11:00:00 UTC);
    let first_call = datetime!(2026-01-01 12:00:00 UTC);
    let now = first_call + Duration::seconds(5);
    let d = decide_window(Some(stale), Some(first_call), now, WINDOW);
    assert_eq!(d.window().start, first_call);
    assert!(d.accepts());
}

#[test]
fn split_uses_floor_division() {
    assert_eq!(split_prize(100, 1), 100);
    assert_eq!(split_prize(100, 2), 50);
    assert_eq!(split_prize(100, 3), 33);
    assert_eq!(split_prize(100, 0), 0);
}

#[test]
fn second_winner_corrects_the_first() {
    let existing = [WindowEntry {
        record_id: 7,
        player_id: 1,
        prize_amount: 100,
    }];
    let plan = plan_split(100, &existing);
    assert_eq!(plan.share, 50);
    assert_eq!(plan.winners, 2);
    assert_eq!(plan.corrections.len(), 1);
    assert_eq!(plan.corrections[0].record_id, 7);
    assert_eq!(plan.corrections[0].delta(), -50);
}

#[test]
fn entries_already_at_share_are_left_alone() {
    let existing = [
        WindowEntry {
            record_id: 1,
            player_id: 1,
            prize_amount: 33,
        },
        WindowEntry {
            record_id: 2,
            player_id: 2,
            prize_amount: 50,
        },
    ];
    let plan = plan_split(100, &existing);
    assert_eq!(plan.share, 33);
    assert_eq!(plan.corrections.len(), 1);
    assert_eq!(plan.corrections[0].player_id, 2);
    assert_eq!(plan.corrections[0].delta(), -17);
}
