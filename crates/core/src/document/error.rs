//! Lifecycle error types.

use thiserror::Error;
use uuid::Uuid;

use docuflow_shared::AppError;

use crate::document::types::DocumentStatus;

/// Errors that can occur during lifecycle transitions.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: DocumentStatus,
        /// The attempted target status.
        to: DocumentStatus,
    },

    /// Approval requires a total amount.
    #[error("Cannot approve a document without a total amount")]
    MissingTotalAmount,

    /// Approval requires an issue date.
    #[error("Cannot approve a document without an issue date")]
    MissingIssueDate,

    /// Rejection reason is required but not provided.
    #[error("Rejection reason is required")]
    RejectionReasonRequired,

    /// Attempted to edit a document that is no longer pending.
    #[error("Cannot edit a document in {status} status")]
    NotEditable {
        /// The current status.
        status: DocumentStatus,
    },

    /// Only approved or rejected documents can be archived.
    #[error("Cannot archive a document in {status} status")]
    NotArchivable {
        /// The current status.
        status: DocumentStatus,
    },

    /// Attempted to archive a document twice.
    #[error("Document is already archived")]
    AlreadyArchived,

    /// Attempted to unarchive a document that is not archived.
    #[error("Document is not archived")]
    NotArchived,

    /// Document not found.
    #[error("Document {0} not found")]
    DocumentNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl LifecycleError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::MissingTotalAmount => "MISSING_TOTAL_AMOUNT",
            Self::MissingIssueDate => "MISSING_ISSUE_DATE",
            Self::RejectionReasonRequired => "REJECTION_REASON_REQUIRED",
            Self::NotEditable { .. } => "NOT_EDITABLE",
            Self::NotArchivable { .. } => "NOT_ARCHIVABLE",
            Self::AlreadyArchived => "ALREADY_ARCHIVED",
            Self::NotArchived => "NOT_ARCHIVED",
            Self::DocumentNotFound(_) => "DOCUMENT_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::DocumentNotFound(_) => Self::NotFound(err.to_string()),
            LifecycleError::Database(msg) => Self::Database(msg),
            _ => Self::BusinessRule(err.to_string()),
        }
    }
}
