//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod company;
mod convert;
pub mod document;
pub mod metrics;

pub use company::{CompanyError, CompanyResolver, ResolveCompanyInput};
pub use document::{
    ArchiveScope, DocumentError, DocumentFilter, DocumentRepository, EditDocumentInput,
    IngestDocumentInput, IngestOutcome, PendingSummary,
};
pub use metrics::{MetricsQueryError, MetricsRepository};
