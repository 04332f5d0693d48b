//! Adapters for external dependencies.

pub mod calls_sea;
pub mod cards_sea;
pub mod players_sea;
pub mod rooms_sea;
pub mod stages_sea;
pub mod winners_sea;
