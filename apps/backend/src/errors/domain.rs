//! Domain-level error type used across services and adapters.
//!
//! This error type is HTTP- and DB-agnostic. Handlers should return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    DbUnavailable,
    DataCorruption,
    Other(String),
}

/// Domain-level not found entities
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Room,
    Player,
    Card,
    Other(String),
}

/// Domain-level conflict kinds
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    /// Same player already holds a record for this pattern in this game.
    AlreadyClaimed,
    /// The pattern (or progressive stage) was won by someone else and is closed.
    PatternAlreadyWon,
    RoomFull,
    DisplayNameTaken,
    RoomCodeConflict,
    DuplicateCall,
    OptimisticLock,
    Other(String),
}

/// Validation and business-rule kinds
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    UnknownPattern,
    UnknownGameType,
    UnknownAiKind,
    InvalidClaim,
    NoWinningPattern,
    PatternNotInPlay,
    FreeCellImmutable,
    CellOutOfRange,
    InvalidProgressiveSelection,
    InvalidLayout,
    InvalidPrize,
    InvalidCardCount,
    InvalidDisplayName,
    ValueNotInPool,
    CallsExhausted,
    GameOver,
    NotHost,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input/user validation or business rule violation
    Validation(ValidationKind, String),
    /// Semantic conflict
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Infrastructure/operational failures
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn validation_other(detail: impl Into<String>) -> Self {
        Self::Validation(ValidationKind::Other("VALIDATION_ERROR".into()), detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    /// True for errors a client may fix by retrying the same request later.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DomainError::Infra(InfraErrorKind::Timeout | InfraErrorKind::DbUnavailable, _)
                | DomainError::Conflict(ConflictKind::OptimisticLock | ConflictKind::DuplicateCall, _)
        )
    }
}
