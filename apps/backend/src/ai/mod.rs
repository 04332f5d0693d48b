//! Automated players.
//!
//! Bots hold ordinary player rows with `ai_kind` set. After every call the
//! dispatcher asks each bot's strategy what to mark and whether to claim,
//! then routes those decisions through the normal game-flow service.

mod diligent;
mod forgetful;
pub mod registry;
mod trait_def;

pub use diligent::Diligent;
pub use forgetful::Forgetful;
pub use registry::{create_ai, ensure_known};
pub use trait_def::AutoPlayer;
