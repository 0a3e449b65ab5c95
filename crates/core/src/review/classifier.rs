//! Review level classification rules.

use docuflow_shared::ReviewThresholds;

use crate::document::types::DocumentType;
use crate::review::types::{ConfidenceScores, ReviewLevel};

/// Stateless classifier mapping confidence scores to a review level.
///
/// This is the sole automatic-approval gate: a document is only ever
/// approved without a human when `classify` returns `ReviewLevel::Auto`.
pub struct ReviewClassifier;

impl ReviewClassifier {
    /// Classifies a document's review level.
    ///
    /// Rules are evaluated in order, first match wins:
    /// 1. overall >= `auto_approve`: `Auto`
    /// 2. overall < `required_below`: `Required`
    /// 3. date < `date_min` OR amount < `amount_min`: `Required`
    /// 4. document type (case-insensitive) not invoice/delivery: `Required`
    /// 5. otherwise: `Recommended`
    ///
    /// Deterministic and side-effect-free; missing scores read as zero.
    #[must_use]
    pub fn classify(
        scores: &ConfidenceScores,
        document_type: &str,
        thresholds: &ReviewThresholds,
    ) -> ReviewLevel {
        if scores.overall() >= thresholds.auto_approve {
            return ReviewLevel::Auto;
        }
        if scores.overall() < thresholds.required_below {
            return ReviewLevel::Required;
        }
        if scores.date() < thresholds.date_min || scores.amount() < thresholds.amount_min {
            return ReviewLevel::Required;
        }
        if !matches!(
            DocumentType::parse(document_type),
            Some(DocumentType::Invoice | DocumentType::Delivery)
        ) {
            return ReviewLevel::Required;
        }
        ReviewLevel::Recommended
    }
}
