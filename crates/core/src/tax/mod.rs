//! Tax field normalization for extracted monetary data.
//!
//! Extraction output is frequently incomplete: a document may carry the
//! taxable base and a tax percentage but no tax amount, or amounts in a
//! locale-specific string form. This module derives the missing fields
//! and parses amounts without ever touching binary floating point.
//!
//! # Modules
//!
//! - `normalize` - Fills derivable gaps in a `TaxBreakdown`
//! - `parse` - Lenient decimal parsing for extracted amount strings
//! - `error` - Tax-specific error types

pub mod error;
pub mod normalize;
pub mod parse;

pub use error::TaxError;
pub use normalize::TaxBreakdown;
pub use parse::parse_amount;
