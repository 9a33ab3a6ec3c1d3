//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant describes a rejected operation that left the ledger unchanged.
/// Transport and storage failures belong to the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input failed validation (blank name, non-positive amount, overflow).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The item is not present.
    #[error("item {0} not found")]
    NotFound(String),

    /// An issue would drive the quantity below zero.
    #[error("cannot issue {requested} of {key}: only {available} in stock")]
    InsufficientQuantity {
        key: String,
        requested: u64,
        available: u64,
    },

    /// The item is already present (name-only catalog).
    #[error("item {0} already exists")]
    Duplicate(String),

    /// The stored record changed underneath us (stale version).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound(key.into())
    }

    pub fn insufficient(key: impl Into<String>, requested: u64, available: u64) -> Self {
        Self::InsufficientQuantity {
            key: key.into(),
            requested,
            available,
        }
    }

    pub fn duplicate(key: impl Into<String>) -> Self {
        Self::Duplicate(key.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
