//! Registered bot strategies.
//!
//! To add one: implement `AutoPlayer`, then add an `AiFactory` entry with a
//! stable `name`. Same seed must give the same behavior.

use super::diligent::Diligent;
use super::forgetful::Forgetful;
use super::trait_def::AutoPlayer;
use crate::errors::domain::{DomainError, ValidationKind};

/// Factory definition for constructing bot implementations.
pub struct AiFactory {
    pub name: &'static str,
    pub version: &'static str,
    pub make: fn(seed: u64) -> Box<dyn AutoPlayer>,
}

static AI_FACTORIES: &[AiFactory] = &[
    AiFactory {
        name: Diligent::NAME,
        version: Diligent::VERSION,
        make: make_diligent,
    },
    AiFactory {
        name: Forgetful::NAME,
        version: Forgetful::VERSION,
        make: make_forgetful,
    },
];

pub fn registered_ais() -> &'static [AiFactory] {
    AI_FACTORIES
}

pub fn by_name(name: &str) -> Option<&'static AiFactory> {
    registered_ais().iter().find(|factory| factory.name == name)
}

pub fn ensure_known(kind: &str) -> Result<&'static AiFactory, DomainError> {
    by_name(kind).ok_or_else(|| {
        DomainError::validation(
            ValidationKind::UnknownAiKind,
            format!("unknown automated player kind '{kind}'"),
        )
    })
}

pub fn create_ai(kind: &str, seed: u64) -> Result<Box<dyn AutoPlayer>, DomainError> {
    ensure_known(kind).map(|factory| (factory.make)(seed))
}

fn make_diligent(_seed: u64) -> Box<dyn AutoPlayer> {
    Box::new(Diligent::new())
}

fn make_forgetful(seed: u64) -> Box<dyn AutoPlayer> {
    Box::new(Forgetful::new(seed))
}
