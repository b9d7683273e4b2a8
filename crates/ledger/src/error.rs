//! The module contains the errors the ledger can return.
//!
//! Validation errors ([`UnknownBeneficiary`], [`InvalidAmount`],
//! [`InsufficientFunds`], [`InvalidEmail`]) are user-correctable and
//! reported inline by callers; none of them is fatal. Storage problems
//! never surface here at all: the store recovers by resetting to the
//! default snapshot.
//!
//! [`UnknownBeneficiary`]: LedgerError::UnknownBeneficiary
//! [`InvalidAmount`]: LedgerError::InvalidAmount
//! [`InsufficientFunds`]: LedgerError::InsufficientFunds
//! [`InvalidEmail`]: LedgerError::InvalidEmail
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Unknown beneficiary: {0}")]
    UnknownBeneficiary(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
    #[error("Invalid beneficiary: {0}")]
    InvalidBeneficiary(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Access denied: {0}")]
    AccessDenied(String),
    #[error("Card is blocked: {0}")]
    CardBlocked(String),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UnknownBeneficiary(a), Self::UnknownBeneficiary(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::InvalidEmail(a), Self::InvalidEmail(b)) => a == b,
            (Self::InvalidBeneficiary(a), Self::InvalidBeneficiary(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::AccessDenied(a), Self::AccessDenied(b)) => a == b,
            (Self::CardBlocked(a), Self::CardBlocked(b)) => a == b,
            _ => false,
        }
    }
}
