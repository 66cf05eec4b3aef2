//! The module contains the errors the engine can throw.
//!
//! Use-case checks surface as one of the recoverable variants; only
//! [`Database`] marks a failed transactional unit.
//!
//! [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed or missing input, rejected before any store access.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The requested entity does not exist.
    #[error("\"{0}\" not found!")]
    NotFound(String),
    /// The entity exists but belongs to another owner.
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// The affected account does not hold enough funds.
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    /// The record was already settled (paid debt, sold holding).
    #[error("Already settled: {0}")]
    AlreadySettled(String),
    /// The operation conflicts with the current state of the ledger.
    #[error("Conflict: {0}")]
    Conflict(String),
    /// A pagination cursor could not be decoded.
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::AlreadySettled(a), Self::AlreadySettled(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::InvalidCursor(a), Self::InvalidCursor(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
