//! Repository functions: domain models over the SeaORM adapters.

pub mod calls;
pub mod cards;
pub mod players;
pub mod rooms;
pub mod stages;
pub mod winners;

use crate::errors::domain::{DomainError, InfraErrorKind};

/// A stored value failed to parse back into its domain type.
pub(crate) fn corrupt(what: &str, detail: impl std::fmt::Display) -> DomainError {
    DomainError::infra(
        InfraErrorKind::DataCorruption,
        format!("stored {what} is invalid: {detail}"),
    )
}
