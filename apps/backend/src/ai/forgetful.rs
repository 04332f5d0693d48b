//! Bot that sometimes misses a called value. Seeded, so a given seed always
//! forgets the same calls.

use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::trait_def::{matching_cell, satisfies_any, AutoPlayer};
use crate::domain::{CallHistory, CalledValue, Card, CellSet, Pattern};

/// Probability of missing a mark.
pub const DEFAULT_MISS_RATE: f64 = 0.25;

pub struct Forgetful {
    miss_rate: f64,
    rng: Mutex<ChaCha8Rng>,
}

impl Forgetful {
    pub const NAME: &'static str = "forgetful";
    pub const VERSION: &'static str = "1.0.0";

    pub fn new(seed: u64) -> Self {
        Self::with_miss_rate(seed, DEFAULT_MISS_RATE)
    }

    pub fn with_miss_rate(seed: u64, miss_rate: f64) -> Self {
        Self {
            miss_rate: miss_rate.clamp(0.0, 1.0),
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

impl AutoPlayer for Forgetful {
    fn decide_marks(&self, card: &Card, call: &CalledValue) -> CellSet {
        let cell = matching_cell(card, call);
        if cell.is_empty() {
            return cell;
        }
        if self.rng.lock().random_bool(self.miss_rate) {
            CellSet::empty()
        } else {
            cell
        }
    }

    fn wants_claim(&self, card: &Card, history: &CallHistory, claimable: &[Pattern]) -> bool {
        satisfies_any(card, history, claimable)
    }
}
