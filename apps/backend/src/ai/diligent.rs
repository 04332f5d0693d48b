//! Bot that marks every called value on its card and claims the moment a
//! claimable pattern is complete.

use super::trait_def::{matching_cell, satisfies_any, AutoPlayer};
use crate::domain::{CallHistory, CalledValue, Card, CellSet, Pattern};

#[derive(Debug, Default, Clone, Copy)]
pub struct Diligent;

impl Diligent {
    pub const NAME: &'static str = "diligent";
    pub const VERSION: &'static str = "1.0.0";

    pub fn new() -> Self {
        Self
    }
}

impl AutoPlayer for Diligent {
    fn decide_marks(&self, card: &Card, call: &CalledValue) -> CellSet {
        matching_cell(card, call)
    }

    fn wants_claim(&self, card: &Card, history: &CallHistory, claimable: &[Pattern]) -> bool {
        satisfies_any(card, history, claimable)
    }
}
