//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula parsing or evaluation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormulaError {
    /// Formula text is malformed
    #[error("Syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    /// Two branches of a binary node produced different numbers of values
    #[error("Shape mismatch: left operand produced {left} values, right produced {right}")]
    Shape { left: usize, right: usize },

    /// Value arithmetic or datasource error
    #[error("{0}")]
    Core(#[from] census_core::Error),
}

impl FormulaError {
    pub(crate) fn syntax<S: Into<String>>(position: usize, message: S) -> Self {
        FormulaError::Syntax {
            position,
            message: message.into(),
        }
    }
}
