//! Error codes for the bingo backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that
//! appear in problem-details responses.

use core::fmt;

/// Centralized error codes for the bingo backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request Validation
    /// Pattern identifier not in the library
    UnknownPattern,
    /// Game type not supported
    UnknownGameType,
    /// Automated player strategy not registered
    UnknownAiKind,
    /// Claimed marks not backed by the call history
    InvalidClaim,
    /// Marks do not satisfy any claimable pattern
    NoWinningPattern,
    /// Asserted pattern is not the one in play
    PatternNotInPlay,
    /// The free cell cannot be unmarked
    FreeCellImmutable,
    /// Cell index outside 0..=24
    CellOutOfRange,
    /// Progressive selection must be 2-4 distinct patterns
    InvalidProgressiveSelection,
    /// Card layout is malformed
    InvalidLayout,
    /// Prize override rejected
    InvalidPrize,
    /// Requested card count outside the allowed range
    InvalidCardCount,
    /// Display name empty or too long
    InvalidDisplayName,
    /// Called value is not part of the room's pool
    ValueNotInPool,
    /// Every value in the pool has been called
    CallsExhausted,
    /// The game already has its terminal winner
    GameOver,
    /// Only the host may perform this action
    NotHost,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    RoomNotFound,
    PlayerNotFound,
    CardNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    AlreadyClaimed,
    PatternAlreadyWon,
    RoomFull,
    DisplayNameTaken,
    RoomCodeConflict,
    DuplicateCall,
    OptimisticLock,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    DbError,
    DbUnavailable,
    /// Database timeout (gateway timeout)
    DbTimeout,
    DataCorruption,
    Internal,
    ConfigError,
}

impl ErrorCode {
    /// Every code, used by uniqueness checks.
    pub const ALL: &'static [ErrorCode] = &[
        Self::UnknownPattern,
        Self::UnknownGameType,
        Self::UnknownAiKind,
        Self::InvalidClaim,
        Self::NoWinningPattern,
        Self::PatternNotInPlay,
        Self::FreeCellImmutable,
        Self::CellOutOfRange,
        Self::InvalidProgressiveSelection,
        Self::InvalidLayout,
        Self::InvalidPrize,
        Self::InvalidCardCount,
        Self::InvalidDisplayName,
        Self::ValueNotInPool,
        Self::CallsExhausted,
        Self::GameOver,
        Self::NotHost,
        Self::ValidationError,
        Self::BadRequest,
        Self::RoomNotFound,
        Self::PlayerNotFound,
        Self::CardNotFound,
        Self::NotFound,
        Self::AlreadyClaimed,
        Self::PatternAlreadyWon,
        Self::RoomFull,
        Self::DisplayNameTaken,
        Self::RoomCodeConflict,
        Self::DuplicateCall,
        Self::OptimisticLock,
        Self::Conflict,
        Self::DbError,
        Self::DbUnavailable,
        Self::DbTimeout,
        Self::DataCorruption,
        Self::Internal,
        Self::ConfigError,
    ];

    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            // Request Validation
            Self::UnknownPattern => "UNKNOWN_PATTERN",
            Self::UnknownGameType => "UNKNOWN_GAME_TYPE",
            Self::UnknownAiKind => "UNKNOWN_AI_KIND",
            Self::InvalidClaim => "INVALID_CLAIM",
            Self::NoWinningPattern => "NO_WINNING_PATTERN",
            Self::PatternNotInPlay => "PATTERN_NOT_IN_PLAY",
            Self::FreeCellImmutable => "FREE_CELL_IMMUTABLE",
            Self::CellOutOfRange => "CELL_OUT_OF_RANGE",
            Self::InvalidProgressiveSelection => "INVALID_PROGRESSIVE_SELECTION",
            Self::InvalidLayout => "INVALID_LAYOUT",
            Self::InvalidPrize => "INVALID_PRIZE",
            Self::InvalidCardCount => "INVALID_CARD_COUNT",
            Self::InvalidDisplayName => "INVALID_DISPLAY_NAME",
            Self::ValueNotInPool => "VALUE_NOT_IN_POOL",
            Self::CallsExhausted => "CALLS_EXHAUSTED",
            Self::GameOver => "GAME_OVER",
            Self::NotHost => "NOT_HOST",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            // Resource Not Found
            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::CardNotFound => "CARD_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            // Business Logic Conflicts
            Self::AlreadyClaimed => "ALREADY_CLAIMED",
            Self::PatternAlreadyWon => "PATTERN_ALREADY_WON",
            Self::RoomFull => "ROOM_FULL",
            Self::DisplayNameTaken => "DISPLAY_NAME_TAKEN",
            Self::RoomCodeConflict => "ROOM_CODE_CONFLICT",
            Self::DuplicateCall => "DUPLICATE_CALL",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::Conflict => "CONFLICT",

            // System Errors
            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
