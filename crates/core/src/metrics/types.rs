//! Rollup input and output types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::document::types::{DocumentStatus, DocumentType, Flow};
use crate::metrics::error::MetricsError;
use crate::review::types::ReviewLevel;

/// The facts about one document that aggregation needs.
///
/// A flattened projection of a persisted document; the db crate maps
/// rows into this so the rollup math stays free of persistence types.
#[derive(Debug, Clone)]
pub struct DocumentFacts {
    /// Kind of document.
    pub document_type: DocumentType,
    /// Lifecycle status.
    pub status: DocumentStatus,
    /// Money direction.
    pub flow: Flow,
    /// Review level at the time of aggregation.
    pub review_level: ReviewLevel,
    /// Whether the document took the automatic approval path.
    pub is_auto_approved: bool,
    /// Issue date, when extracted.
    pub issue_date: Option<NaiveDate>,
    /// Taxable base amount.
    pub base_amount: Option<Decimal>,
    /// Tax amount.
    pub tax_amount: Option<Decimal>,
    /// Total amount.
    pub total_amount: Option<Decimal>,
    /// Overall extraction confidence.
    pub overall_confidence: Option<Decimal>,
}

/// An inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range.
    pub start: NaiveDate,
    /// Last day of the range.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a validated range.
    ///
    /// # Errors
    ///
    /// Returns `MetricsError::InvalidDateRange` when start is after end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, MetricsError> {
        if start > end {
            return Err(MetricsError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Number of days covered, inclusive.
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Returns true if the date falls inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Bucket size of the chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartGranularity {
    /// One bucket per day; used for ranges up to 31 days.
    Daily,
    /// One bucket per calendar month.
    Monthly,
}

/// One time bucket of the chart series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartBucket {
    /// Bucket key: the day, or the first day of the month.
    pub period: NaiveDate,
    /// Signed income base total for the bucket.
    pub income_base: Decimal,
    /// Signed expense base total for the bucket.
    pub expense_base: Decimal,
}

/// Count rollups over the document set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCounts {
    /// All documents in scope.
    pub total: u64,
    /// Approved documents.
    pub approved: u64,
    /// Rejected documents.
    pub rejected: u64,
    /// Pending documents.
    pub pending: u64,
    /// Approved via the automatic path.
    pub auto_approved: u64,
    /// Approved by a human.
    pub manually_approved: u64,
    /// Documents at review level `manual`.
    pub manual_review_count: u64,
    /// Share of documents approved, as a percentage.
    pub approval_rate: Decimal,
    /// Average overall confidence over approved documents.
    pub average_confidence: Decimal,
}

/// Signed financial totals over approved invoices and corrections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// Income base total.
    pub income_base: Decimal,
    /// Income tax total.
    pub income_tax: Decimal,
    /// Income grand total.
    pub income_total: Decimal,
    /// Expense base total.
    pub expense_base: Decimal,
    /// Expense tax total.
    pub expense_tax: Decimal,
    /// Expense grand total.
    pub expense_total: Decimal,
    /// Income base minus expense base.
    pub profit: Decimal,
    /// Profit as a percentage of income base (0 when income base <= 0).
    pub profit_margin: Decimal,
}

/// VAT rollup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatSummary {
    /// VAT collected on income.
    pub collected: Decimal,
    /// VAT paid on expenses.
    pub paid: Decimal,
    /// Collected minus paid.
    pub balance: Decimal,
}

/// Snapshot of how documents are distributed across outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDistribution {
    /// Approved via the automatic path.
    pub auto_approved: u64,
    /// Approved by a human.
    pub manual_approved: u64,
    /// Still pending.
    pub pending: u64,
    /// Rejected.
    pub rejected: u64,
}

/// Full aggregation output for a tenant and optional date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Count rollups.
    pub counts: DocumentCounts,
    /// Financial rollups.
    pub financials: FinancialSummary,
    /// VAT rollup.
    pub vat: VatSummary,
    /// Time-bucketed chart series, ordered by period.
    pub chart: Vec<ChartBucket>,
    /// Bucket size used for the chart.
    pub granularity: ChartGranularity,
    /// Status distribution snapshot.
    pub status_distribution: StatusDistribution,
}
