//! Confidence-based review level classification.
//!
//! The extraction engine attaches per-field confidence scores to every
//! document. This module decides how much human oversight each document
//! needs before its extracted data is trusted, and is the sole gate for
//! the automatic approval path.
//!
//! # Modules
//!
//! - `types` - Review levels and confidence score maps
//! - `classifier` - The classification rules

pub mod classifier;
pub mod types;

pub use classifier::ReviewClassifier;
pub use types::{ConfidenceScores, ReviewLevel};
