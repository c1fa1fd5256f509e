//! Errors surfaced by the conversion core

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The amount could not be read as an exact decimal.
    #[error("Unable to convert amount to Decimal: {input}")]
    InvalidAmount { input: String },
}

impl ConversionError {
    pub fn invalid_amount(input: impl Into<String>) -> Self {
        ConversionError::InvalidAmount {
            input: input.into(),
        }
    }
}
