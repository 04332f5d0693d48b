pub mod calls;
pub mod cards;
pub mod players;
pub mod progressive_stages;
pub mod rooms;
pub mod winners;

pub use calls::Entity as Calls;
pub use cards::Entity as Cards;
pub use players::Entity as Players;
pub use progressive_stages::Entity as ProgressiveStages;
pub use rooms::Entity as Rooms;
pub use winners::Entity as Winners;
