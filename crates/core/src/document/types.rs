//! Document domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Document status in the review lifecycle.
///
/// Documents progress through these states from ingestion onward.
/// The valid transitions are:
/// - Pending → Approved (approve, or the automatic path at ingestion)
/// - Pending → Rejected (reject)
///
/// Approved and Rejected are terminal except for the orthogonal
/// archive flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Awaiting human review; the only editable state.
    Pending,
    /// Extracted data has been accepted.
    Approved,
    /// Extracted data has been rejected.
    Rejected,
}

impl DocumentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true if the document's fields can still be modified.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if the status is terminal (archivable).
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of financial document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// A standard invoice.
    Invoice,
    /// A delivery note; never contributes to financial rollups.
    Delivery,
    /// A credit/correction note adjusting a prior invoice.
    CorrectedInvoice,
}

impl DocumentType {
    /// Returns the string representation of the type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Delivery => "delivery",
            Self::CorrectedInvoice => "corrected_invoice",
        }
    }

    /// Parses a type from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "invoice" => Some(Self::Invoice),
            "delivery" => Some(Self::Delivery),
            "corrected_invoice" => Some(Self::CorrectedInvoice),
            _ => None,
        }
    }

    /// Returns true if approved documents of this type enter the
    /// financial rollups.
    #[must_use]
    pub fn is_financial(&self) -> bool {
        matches!(self, Self::Invoice | Self::CorrectedInvoice)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of money for a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    /// Income (a sale).
    In,
    /// Expense (a purchase).
    Out,
    /// Direction could not be determined.
    #[default]
    Unknown,
}

impl Flow {
    /// Returns the string representation of the flow.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::Unknown => "unknown",
        }
    }

    /// Parses a flow from a string, defaulting to `Unknown`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "in" => Self::In,
            "out" => Self::Out,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            DocumentStatus::Pending,
            DocumentStatus::Approved,
            DocumentStatus::Rejected,
        ] {
            assert_eq!(DocumentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(DocumentStatus::parse("PENDING"), Some(DocumentStatus::Pending));
        assert_eq!(DocumentStatus::parse("needs_review"), None);
    }

    #[test]
    fn test_status_editable_and_terminal() {
        assert!(DocumentStatus::Pending.is_editable());
        assert!(!DocumentStatus::Approved.is_editable());
        assert!(!DocumentStatus::Rejected.is_editable());

        assert!(!DocumentStatus::Pending.is_terminal());
        assert!(DocumentStatus::Approved.is_terminal());
        assert!(DocumentStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_type_round_trip() {
        for doc_type in [
            DocumentType::Invoice,
            DocumentType::Delivery,
            DocumentType::CorrectedInvoice,
        ] {
            assert_eq!(DocumentType::parse(doc_type.as_str()), Some(doc_type));
        }
        assert_eq!(DocumentType::parse("Invoice"), Some(DocumentType::Invoice));
        assert_eq!(DocumentType::parse("receipt"), None);
    }

    #[test]
    fn test_type_financial_contribution() {
        assert!(DocumentType::Invoice.is_financial());
        assert!(DocumentType::CorrectedInvoice.is_financial());
        assert!(!DocumentType::Delivery.is_financial());
    }

    #[test]
    fn test_flow_parse_defaults_to_unknown() {
        assert_eq!(Flow::parse("in"), Flow::In);
        assert_eq!(Flow::parse("OUT"), Flow::Out);
        assert_eq!(Flow::parse(""), Flow::Unknown);
        assert_eq!(Flow::parse("sideways"), Flow::Unknown);
    }
}
