//! RNG seed derivation for deterministic room behaviour.
//!
//! Every random choice in a room (card layouts, automatic calls, bot
//! slips) is derived from the room's base seed so a room can be replayed.

/// Seed for dealing one card.
///
/// Unique per (room, player, card number); stable across re-reads.
pub fn derive_card_seed(room_seed: i64, player_id: i64, card_no: i16) -> u64 {
    let base = room_seed as u64;
    base.wrapping_add((player_id as u64).wrapping_mul(1_000_003))
        .wrapping_add((card_no as u64).wrapping_mul(97))
        .wrapping_add(1)
}

/// Seed for drawing call number `seq` of game `game_no`.
pub fn derive_call_seed(room_seed: i64, game_no: i32, seq: u32) -> u64 {
    let base = room_seed as u64;
    base.wrapping_add((game_no as u64).wrapping_mul(10_000_019))
        .wrapping_add(u64::from(seq).wrapping_mul(7_919))
        .wrapping_add(2)
}

/// Seed for a bot's decisions on one call.
pub fn derive_bot_seed(room_seed: i64, player_id: i64, game_no: i32, seq: u32) -> u64 {
    derive_call_seed(room_seed, game_no, seq)
        .wrapping_add((player_id as u64).wrapping_mul(104_729))
        .wrapping_add(3)
}
