//! Room code generation.
//!
//! Room codes are 6-character strings over Crockford's Base32 alphabet, which
//! drops I, L, O and U so codes survive being read aloud.

use rand::Rng;

const CROCKFORD: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

pub const ROOM_CODE_LEN: usize = 6;

pub fn generate_room_code() -> String {
    generate_with(&mut rand::rng())
}

pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ROOM_CODE_LEN)
        .map(|_| CROCKFORD[rng.random_range(0..CROCKFORD.len())] as char)
        .collect()
}

/// Uppercase and trim user input; `None` if it cannot be a room code.
pub fn normalize(input: &str) -> Option<String> {
    let code = input.trim().to_ascii_uppercase();
    let valid = code.len() == ROOM_CODE_LEN && code.bytes().all(|b| CROCKFORD.contains(&b));
    valid.then_some(code)
}
