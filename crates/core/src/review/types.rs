//! Review domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::document::types::DocumentStatus;

/// Degree of human oversight a document requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewLevel {
    /// Confidence gate satisfied; document is approved automatically.
    Auto,
    /// Review is suggested but not blocking.
    Recommended,
    /// Review is mandatory before the data can be trusted.
    Required,
    /// A reviewer has hand-edited the document. Never produced by
    /// classification; set only by the edit transition.
    Manual,
}

impl ReviewLevel {
    /// Returns the string representation of the level.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Recommended => "recommended",
            Self::Required => "required",
            Self::Manual => "manual",
        }
    }

    /// Parses a level from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "recommended" => Some(Self::Recommended),
            "required" => Some(Self::Required),
            "manual" => Some(Self::Manual),
            _ => None,
        }
    }

    /// Returns the document status a freshly ingested document starts in.
    ///
    /// `Auto` is the only level that approves without a human in the loop.
    #[must_use]
    pub fn initial_status(&self) -> DocumentStatus {
        match self {
            Self::Auto => DocumentStatus::Approved,
            _ => DocumentStatus::Pending,
        }
    }
}

impl fmt::Display for ReviewLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Named per-field confidence scores from the extraction engine.
///
/// Keys are extraction field names (`overall`, `date`, `amount`, ...).
/// A missing key reads as zero confidence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfidenceScores(pub BTreeMap<String, Decimal>);

impl ConfidenceScores {
    /// Key for the overall document confidence.
    pub const OVERALL: &'static str = "overall";
    /// Key for the issue date confidence.
    pub const DATE: &'static str = "date";
    /// Key for the monetary amount confidence.
    pub const AMOUNT: &'static str = "amount";

    /// Creates an empty score map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the score for a key, defaulting to zero when absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Decimal {
        self.0.get(key).copied().unwrap_or(Decimal::ZERO)
    }

    /// Sets a score, returning self for chaining in tests and builders.
    #[must_use]
    pub fn with(mut self, key: &str, score: Decimal) -> Self {
        self.0.insert(key.to_string(), score);
        self
    }

    /// The overall document confidence.
    #[must_use]
    pub fn overall(&self) -> Decimal {
        self.get(Self::OVERALL)
    }

    /// The issue date confidence.
    #[must_use]
    pub fn date(&self) -> Decimal {
        self.get(Self::DATE)
    }

    /// The amount confidence.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.get(Self::AMOUNT)
    }
}
