// Unit tests for error mapping - pure domain logic without HTTP or database dependencies
use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::errors::ErrorCode;
use crate::AppError;

#[test]
fn claim_rejections_map_to_422() {
    for (kind, code) in [
        (ValidationKind::InvalidClaim, ErrorCode::InvalidClaim),
        (ValidationKind::NoWinningPattern, ErrorCode::NoWinningPattern),
        (ValidationKind::FreeCellImmutable, ErrorCode::FreeCellImmutable),
        (ValidationKind::GameOver, ErrorCode::GameOver),
    ] {
        let app: AppError = DomainError::validation(kind, "nope").into();
        assert_eq!(app.code(), code);
        assert_eq!(app.status().as_u16(), 422);
    }
}

#[test]
fn configuration_errors_map_to_400() {
    let app: AppError = DomainError::validation(ValidationKind::UnknownPattern, "zigzag").into();
    assert_eq!(app.code().as_str(), "UNKNOWN_PATTERN");
    assert_eq!(app.status().as_u16(), 400);
}

#[test]
fn not_host_is_forbidden() {
    let app: AppError = DomainError::validation(ValidationKind::NotHost, "host only").into();
    assert_eq!(app.code(), ErrorCode::NotHost);
    assert_eq!(app.status().as_u16(), 403);
}

#[test]
fn maps_conflicts() {
    let dup = DomainError::conflict(ConflictKind::AlreadyClaimed, "twice");
    let app: AppError = dup.into();
    assert_eq!(app.code().as_str(), "ALREADY_CLAIMED");
    assert_eq!(app.status().as_u16(), 409);

    let won = DomainError::conflict(ConflictKind::PatternAlreadyWon, "taken");
    let app: AppError = won.into();
    assert_eq!(app.code().as_str(), "PATTERN_ALREADY_WON");
    assert_eq!(app.status().as_u16(), 409);

    let full = DomainError::conflict(ConflictKind::RoomFull, "full");
    let app: AppError = full.into();
    assert_eq!(app.code(), ErrorCode::RoomFull);

    // Generic conflict fallback
    let other = DomainError::conflict(ConflictKind::Other("x".into()), "generic conflict");
    let app: AppError = other.into();
    assert_eq!(app.code().as_str(), "CONFLICT");
    assert_eq!(app.status().as_u16(), 409);
}

#[test]
fn maps_not_found() {
    let nf = DomainError::not_found(NotFoundKind::Room, "no room");
    let app: AppError = nf.into();
    assert_eq!(app.code().as_str(), "ROOM_NOT_FOUND");
    assert_eq!(app.status().as_u16(), 404);

    let nf = DomainError::not_found(NotFoundKind::Card, "no card");
    let app: AppError = nf.into();
    assert_eq!(app.code(), ErrorCode::CardNotFound);
}

#[test]
fn maps_infra() {
    let t = DomainError::infra(InfraErrorKind::Timeout, "timeout");
    let app: AppError = t.into();
    assert_eq!(app.code().as_str(), "DB_TIMEOUT");
    assert_eq!(app.status().as_u16(), 504);
    assert!(matches!(app, AppError::Timeout { .. }));
    assert!(app.is_retryable());

    let down = DomainError::infra(InfraErrorKind::DbUnavailable, "down");
    let app: AppError = down.into();
    assert_eq!(app.code().as_str(), "DB_UNAVAILABLE");
    assert_eq!(app.status().as_u16(), 503);

    let corrupt = DomainError::infra(InfraErrorKind::DataCorruption, "bad json");
    let app: AppError = corrupt.into();
    assert_eq!(app.code(), ErrorCode::DataCorruption);
    assert_eq!(app.status().as_u16(), 500);
    assert!(!app.is_retryable());
}

#[test]
fn transient_classification() {
    assert!(DomainError::conflict(ConflictKind::OptimisticLock, "x").is_transient());
    assert!(!DomainError::conflict(ConflictKind::AlreadyClaimed, "x").is_transient());
    assert!(!DomainError::validation(ValidationKind::InvalidClaim, "x").is_transient());
}
