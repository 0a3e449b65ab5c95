//! Tax error types.

use thiserror::Error;

/// Errors that can occur while handling extracted monetary fields.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxError {
    /// An amount string could not be parsed into a decimal.
    #[error("Unparsable amount: {0:?}")]
    UnparsableAmount(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unparsable_amount_display() {
        let err = TaxError::UnparsableAmount("abc".to_string());
        assert_eq!(err.to_string(), "Unparsable amount: \"abc\"");
    }
}
