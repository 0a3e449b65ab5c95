//! Count and financial rollup computation.
//!
//! Read-only aggregation over a tenant-scoped, range-filtered set of
//! documents: counts, signed financial totals, VAT balance, profit, a
//! time-bucketed chart, and a status distribution snapshot. Everything
//! is computed in a single pass.
//!
//! # Modules
//!
//! - `types` - Rollup input and output types
//! - `error` - Metrics-specific error types
//! - `service` - The aggregation logic

pub mod error;
pub mod service;
pub mod types;

pub use error::MetricsError;
pub use service::MetricsService;
pub use types::{
    ChartBucket, ChartGranularity, DateRange, DocumentCounts, DocumentFacts, FinancialSummary,
    MetricsReport, StatusDistribution, VatSummary,
};
