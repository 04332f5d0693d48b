// Proptest generators for bingo domain types.

use proptest::prelude::*;

use crate::domain::calls::{CallHistory, GameType};
use crate::domain::card::{Card, CardLayout};
use crate::domain::cells::{CellSet, CELL_COUNT};
use crate::domain::dealing::deal_layout;
use crate::domain::patterns::Pattern;

/// Any of the supported patterns
pub fn pattern() -> impl Strategy<Value = Pattern> {
    proptest::sample::select(Pattern::ALL.to_vec())
}

/// Any cell index on the card
pub fn cell_index() -> impl Strategy<Value = u8> {
    0..CELL_COUNT
}

/// Arbitrary mark set (may or may not include the free cell)
pub fn cell_set() -> impl Strategy<Value = CellSet> {
    (0u32..(1 << CELL_COUNT)).prop_map(CellSet::from_bits)
}

/// 2-4 distinct patterns in random order
pub fn progressive_selection() -> impl Strategy<Value = Vec<Pattern>> {
    (2usize..=4).prop_flat_map(|n| {
        Just(Pattern::ALL.to_vec())
            .prop_shuffle()
            .prop_map(move |all| all.into_iter().take(n).collect())
    })
}

pub fn game_type() -> impl Strategy<Value = GameType> {
    prop_oneof![Just(GameType::Numbers), Just(GameType::Words)]
}

/// Dealt layout for a random game type and seed
pub fn layout() -> impl Strategy<Value = CardLayout> {
    (game_type(), any::<u64>()).prop_filter_map("dealing failed", |(g, seed)| {
        deal_layout(g, seed).ok()
    })
}

/// Card with no stored marks
pub fn fresh_card() -> impl Strategy<Value = Card> {
    layout().prop_map(|layout| Card::new(1, 1, layout, CellSet::empty()))
}

/// Call history containing exactly the values under `cells` on `layout`
pub fn history_for(layout: &CardLayout, cells: CellSet) -> CallHistory {
    let mut history = CallHistory::new();
    let mut at = time::OffsetDateTime::UNIX_EPOCH;
    for index in cells.iter() {
        if let Some(label) = layout.cell(index).and_then(|c| c.label()) {
            at += time::Duration::seconds(1);
            let _ = history.append(label.to_string(), at);
        }
    }
    history
}
