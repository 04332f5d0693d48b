//! Services: transactional orchestration of domain logic and repositories.

pub mod ai_dispatch;
pub mod auto_caller;
pub mod clock;
pub mod game_flow;
pub mod rooms;
