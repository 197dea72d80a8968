//! The module contains the errors the engine can throw.
//!
//! Validation failures ([`InvalidAmount`], [`InsufficientFunds`],
//! [`InvalidTransfer`]) are caller-correctable and are never partially
//! applied. [`Database`] wraps store failures; a money-moving sequence that
//! hits one is rolled back as a whole.
//!
//! [`InvalidAmount`]: EngineError::InvalidAmount
//! [`InsufficientFunds`]: EngineError::InsufficientFunds
//! [`InvalidTransfer`]: EngineError::InvalidTransfer
//! [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Insufficient balance: {0}")]
    InsufficientFunds(String),
    #[error("Invalid transfer: {0}")]
    InvalidTransfer(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::InvalidTransfer(a), Self::InvalidTransfer(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
