//! DTOs for winners_sea adapter.

use time::OffsetDateTime;

#[derive(Debug, Clone)]
pub struct WinnerCreate {
    pub room_id: i64,
    pub game_no: i32,
    pub player_id: i64,
    pub card_id: i64,
    pub win_type: String,
    pub prize_amount: i64,
    pub claim_id: Option<String>,
    pub claimed_at: OffsetDateTime,
}
