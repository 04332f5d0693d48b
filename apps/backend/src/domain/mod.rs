//! Domain layer: pure bingo logic.
//!
//! Nothing in here touches the database, the clock or HTTP. Time is always
//! passed in by the caller.

pub mod adjudication;
pub mod calls;
pub mod card;
pub mod cells;
pub mod dealing;
pub mod lifecycle;
pub mod patterns;
pub mod progressive;
pub mod room_config;
pub mod seed_derivation;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_adjudication;
#[cfg(test)]
mod tests_patterns;

// Re-exports for ergonomics
pub use adjudication::{decide_window, plan_split, validate_claim_marks, FairnessWindow, WindowDecision};
pub use calls::{CallHistory, CalledValue, GameType};
pub use card::{Card, CardLayout, Cell};
pub use cells::{CellSet, FREE_CELL};
pub use lifecycle::{LifecycleView, RoomPhase};
pub use patterns::Pattern;
pub use progressive::{ProgressiveState, Stage};
pub use room_config::{RoomConfig, WinMode};
