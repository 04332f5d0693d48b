use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::errors::ErrorCode;
use crate::trace_ctx;

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation {
        code: ErrorCode,
        detail: String,
        status: StatusCode,
    },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Forbidden: {detail}")]
    Forbidden { code: ErrorCode, detail: String },
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Database error: {detail}")]
    Db { code: ErrorCode, detail: String },
    #[error("Database unavailable: {detail}")]
    DbUnavailable { detail: String },
    #[error("Timeout: {detail}")]
    Timeout { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Forbidden { code, .. }
            | AppError::BadRequest { code, .. }
            | AppError::Conflict { code, .. }
            | AppError::Db { code, .. } => *code,
            AppError::DbUnavailable { .. } => ErrorCode::DbUnavailable,
            AppError::Timeout { .. } => ErrorCode::DbTimeout,
            AppError::Internal { .. } => ErrorCode::Internal,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            AppError::Validation { detail, .. }
            | AppError::NotFound { detail, .. }
            | AppError::Forbidden { detail, .. }
            | AppError::BadRequest { detail, .. }
            | AppError::Conflict { detail, .. }
            | AppError::Db { detail, .. }
            | AppError::DbUnavailable { detail }
            | AppError::Timeout { detail }
            | AppError::Internal { detail }
            | AppError::Config { detail } => detail,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { status, .. } => *status,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Db { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DbUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 422 validation failure.
    pub fn invalid(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
            status: StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn bad_request(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn not_found(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn forbidden(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Forbidden {
            code,
            detail: detail.into(),
        }
    }

    pub fn conflict(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            detail: detail.into(),
        }
    }

    pub fn db(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Db {
            code,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    /// Server-side failures a client may retry; everything else is final.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::DbUnavailable { .. } | AppError::Timeout { .. }
        ) || matches!(self.code(), ErrorCode::OptimisticLock | ErrorCode::DuplicateCall)
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn validation_code(kind: &ValidationKind) -> ErrorCode {
    match kind {
        ValidationKind::UnknownPattern => ErrorCode::UnknownPattern,
        ValidationKind::UnknownGameType => ErrorCode::UnknownGameType,
        ValidationKind::UnknownAiKind => ErrorCode::UnknownAiKind,
        ValidationKind::InvalidClaim => ErrorCode::InvalidClaim,
        ValidationKind::NoWinningPattern => ErrorCode::NoWinningPattern,
        ValidationKind::PatternNotInPlay => ErrorCode::PatternNotInPlay,
        ValidationKind::FreeCellImmutable => ErrorCode::FreeCellImmutable,
        ValidationKind::CellOutOfRange => ErrorCode::CellOutOfRange,
        ValidationKind::InvalidProgressiveSelection => ErrorCode::InvalidProgressiveSelection,
        ValidationKind::InvalidLayout => ErrorCode::InvalidLayout,
        ValidationKind::InvalidPrize => ErrorCode::InvalidPrize,
        ValidationKind::InvalidCardCount => ErrorCode::InvalidCardCount,
        ValidationKind::InvalidDisplayName => ErrorCode::InvalidDisplayName,
        ValidationKind::ValueNotInPool => ErrorCode::ValueNotInPool,
        ValidationKind::CallsExhausted => ErrorCode::CallsExhausted,
        ValidationKind::GameOver => ErrorCode::GameOver,
        ValidationKind::NotHost => ErrorCode::NotHost,
        ValidationKind::Other(_) => ErrorCode::ValidationError,
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(kind, detail) => {
                let code = validation_code(&kind);
                match kind {
                    // Configuration errors: the request itself is malformed.
                    ValidationKind::UnknownPattern
                    | ValidationKind::UnknownGameType
                    | ValidationKind::UnknownAiKind => AppError::bad_request(code, detail),
                    ValidationKind::NotHost => AppError::forbidden(code, detail),
                    _ => AppError::invalid(code, detail),
                }
            }
            DomainError::Conflict(kind, detail) => {
                let code = match kind {
                    ConflictKind::AlreadyClaimed => ErrorCode::AlreadyClaimed,
                    ConflictKind::PatternAlreadyWon => ErrorCode::PatternAlreadyWon,
                    ConflictKind::RoomFull => ErrorCode::RoomFull,
                    ConflictKind::DisplayNameTaken => ErrorCode::DisplayNameTaken,
                    ConflictKind::RoomCodeConflict => ErrorCode::RoomCodeConflict,
                    ConflictKind::DuplicateCall => ErrorCode::DuplicateCall,
                    ConflictKind::OptimisticLock => ErrorCode::OptimisticLock,
                    ConflictKind::Other(_) => ErrorCode::Conflict,
                };
                AppError::conflict(code, detail)
            }
            DomainError::NotFound(kind, detail) => {
                let code = match kind {
                    NotFoundKind::Room => ErrorCode::RoomNotFound,
                    NotFoundKind::Player => ErrorCode::PlayerNotFound,
                    NotFoundKind::Card => ErrorCode::CardNotFound,
                    NotFoundKind::Other(_) => ErrorCode::NotFound,
                };
                AppError::not_found(code, detail)
            }
            DomainError::Infra(kind, detail) => match kind {
                InfraErrorKind::Timeout => AppError::Timeout { detail },
                InfraErrorKind::DbUnavailable => AppError::DbUnavailable { detail },
                InfraErrorKind::DataCorruption => AppError::db(ErrorCode::DataCorruption, detail),
                InfraErrorKind::Other(_) => AppError::db(ErrorCode::DbError, detail),
            },
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::from(DomainError::from(e))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code();
        let trace_id = trace_ctx::trace_id();

        let problem_details = ProblemDetails {
            type_: format!("https://bingo.example/errors/{}", code.as_str()),
            title: Self::humanize_code(code.as_str()),
            status: status.as_u16(),
            detail: self.detail().to_string(),
            code: code.as_str().to_string(),
            trace_id: trace_id.clone(),
        };

        HttpResponse::build(status)
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id))
            .json(problem_details)
    }
}
