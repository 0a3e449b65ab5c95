//! Metrics repository: loads document facts and runs the aggregation.

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use thiserror::Error;
use uuid::Uuid;

use docuflow_core::metrics::{DateRange, DocumentFacts, MetricsError, MetricsReport, MetricsService};
use docuflow_core::review::ConfidenceScores;
use docuflow_shared::error::AppError;

use crate::entities::documents;
use crate::repositories::convert::{flow_to_core, level_to_core, status_to_core, type_to_core};

/// Errors raised while building a metrics report.
#[derive(Debug, Error)]
pub enum MetricsQueryError {
    /// The aggregation inputs were invalid.
    #[error(transparent)]
    Metrics(#[from] MetricsError),
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl From<MetricsQueryError> for AppError {
    fn from(err: MetricsQueryError) -> Self {
        match err {
            MetricsQueryError::Metrics(e) => Self::Validation(e.to_string()),
            MetricsQueryError::Database(msg) => Self::Database(msg),
        }
    }
}

/// Read-only repository producing aggregated metrics reports.
///
/// Reads run outside any explicit transaction; a recent consistent
/// snapshot is sufficient for dashboard rollups.
#[derive(Debug, Clone)]
pub struct MetricsRepository {
    db: DatabaseConnection,
}

impl MetricsRepository {
    /// Creates a new metrics repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the full metrics report for a tenant.
    ///
    /// Archived documents never contribute. When a range is supplied,
    /// undated documents and documents outside the range are excluded
    /// from every rollup.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn report(
        &self,
        tenant_id: Uuid,
        range: Option<DateRange>,
    ) -> Result<MetricsReport, MetricsQueryError> {
        let rows = documents::Entity::find()
            .filter(documents::Column::TenantId.eq(tenant_id))
            .filter(documents::Column::IsArchived.eq(false))
            .all(&self.db)
            .await
            .map_err(|e| MetricsQueryError::Database(e.to_string()))?;

        let facts: Vec<DocumentFacts> = rows.iter().map(document_facts).collect();

        tracing::debug!(
            tenant_id = %tenant_id,
            documents = facts.len(),
            "aggregating metrics"
        );

        Ok(MetricsService::aggregate(&facts, range)?)
    }
}

/// Projects a document row onto the facts the aggregation consumes.
fn document_facts(row: &documents::Model) -> DocumentFacts {
    let overall_confidence = serde_json::from_value::<ConfidenceScores>(row.confidence.clone())
        .ok()
        .and_then(|scores| scores.0.get(ConfidenceScores::OVERALL).copied());

    DocumentFacts {
        document_type: type_to_core(&row.document_type),
        status: status_to_core(&row.status),
        flow: flow_to_core(&row.flow),
        review_level: level_to_core(&row.review_level),
        is_auto_approved: row.is_auto_approved,
        issue_date: row.issue_date,
        base_amount: row.base_amount,
        tax_amount: row.tax_amount,
        total_amount: row.total_amount,
        overall_confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use crate::entities::sea_orm_active_enums as db_enums;
    use docuflow_core::document::{DocumentStatus, DocumentType, Flow};
    use docuflow_core::review::ReviewLevel;

    fn row(confidence: serde_json::Value) -> documents::Model {
        let now = Utc::now().into();
        documents::Model {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            external_id: "doc-1".to_string(),
            company_id: None,
            document_type: db_enums::DocumentType::Invoice,
            document_number: None,
            issue_date: None,
            base_amount: Some(dec!(100.00)),
            tax_amount: Some(dec!(21.00)),
            tax_percentage: Some(dec!(21.00)),
            total_amount: Some(dec!(121.00)),
            confidence,
            status: db_enums::DocumentStatus::Approved,
            review_level: db_enums::ReviewLevel::Auto,
            flow: db_enums::DocumentFlow::In,
            is_auto_approved: true,
            is_archived: false,
            archived_at: None,
            archived_by: None,
            approved_at: None,
            approved_by: None,
            rejected_at: None,
            rejected_by: None,
            rejection_reason: None,
            edited_at: None,
            reviewed_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_document_facts_projection() {
        let facts = document_facts(&row(serde_json::json!({"overall": "0.93", "date": "0.88"})));

        assert_eq!(facts.document_type, DocumentType::Invoice);
        assert_eq!(facts.status, DocumentStatus::Approved);
        assert_eq!(facts.flow, Flow::In);
        assert_eq!(facts.review_level, ReviewLevel::Auto);
        assert!(facts.is_auto_approved);
        assert_eq!(facts.total_amount, Some(dec!(121.00)));
        assert_eq!(facts.overall_confidence, Some(dec!(0.93)));
    }

    #[test]
    fn test_missing_overall_confidence_reads_as_none() {
        let facts = document_facts(&row(serde_json::json!({"date": "0.88"})));
        assert_eq!(facts.overall_confidence, None);
    }
}
