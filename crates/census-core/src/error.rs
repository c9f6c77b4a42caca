//! Error types for census-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while combining values or talking to a data store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Datasource selector is not on the allow-list
    #[error("Unsupported vintage: {0}")]
    UnsupportedVintage(String),

    /// Geography descriptor is missing a required key
    #[error("Malformed geography: missing key {key}")]
    MalformedGeography { key: &'static str },

    /// Divisor magnitude was zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Decimal arithmetic overflowed
    #[error("Arithmetic overflow in {op}")]
    Overflow { op: &'static str },

    /// Table identifier has no column mapping
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// Backing store failure
    #[error("Store error: {0}")]
    Store(String),
}

impl Error {
    /// Create a new store error with a message
    pub fn store<S: Into<String>>(msg: S) -> Self {
        Error::Store(msg.into())
    }
}
