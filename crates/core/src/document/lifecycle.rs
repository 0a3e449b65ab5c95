//! Lifecycle service for document state transitions.
//!
//! This module implements the core state machine logic for moving
//! documents through the review lifecycle. Each edge has its own
//! transition function with hard guards; a violated precondition is a
//! typed error, never a silent no-op.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::document::error::LifecycleError;
use crate::document::types::DocumentStatus;
use crate::review::types::ReviewLevel;

/// Lifecycle action representing a state transition with audit data.
///
/// Each variant captures the transition performed, the resulting status
/// when it changes, and the audit trail information (who, when, why).
#[derive(Debug, Clone)]
pub enum LifecycleAction {
    /// Approve a pending document.
    Approve {
        /// The new status after approval.
        new_status: DocumentStatus,
        /// The user who approved the document.
        approved_by: Uuid,
        /// When the document was approved.
        approved_at: DateTime<Utc>,
    },
    /// Reject a pending document.
    Reject {
        /// The new status after rejection.
        new_status: DocumentStatus,
        /// The user who rejected the document.
        rejected_by: Uuid,
        /// When the document was rejected.
        rejected_at: DateTime<Utc>,
        /// The reason for rejection.
        rejection_reason: String,
    },
    /// Hand-edit a pending document; status is unchanged.
    Edit {
        /// The review level after an edit (always `Manual`).
        review_level: ReviewLevel,
        /// The user who edited the document.
        reviewed_by: Uuid,
        /// When the document was edited.
        edited_at: DateTime<Utc>,
    },
    /// Archive a terminal document.
    Archive {
        /// The user who archived the document.
        archived_by: Uuid,
        /// When the document was archived.
        archived_at: DateTime<Utc>,
    },
    /// Restore an archived document; archive metadata is cleared.
    Unarchive,
}

impl LifecycleAction {
    /// Returns the new status resulting from this action, if it changes.
    #[must_use]
    pub fn new_status(&self) -> Option<DocumentStatus> {
        match self {
            Self::Approve { new_status, .. } | Self::Reject { new_status, .. } => {
                Some(*new_status)
            }
            Self::Edit { .. } | Self::Archive { .. } | Self::Unarchive => None,
        }
    }
}

/// Stateless service for managing document lifecycle transitions.
///
/// All methods are associated functions that validate and execute
/// state transitions, returning the appropriate `LifecycleAction`
/// with audit trail information.
pub struct LifecycleService;

impl LifecycleService {
    /// Approve a pending document.
    ///
    /// # Arguments
    /// * `current_status` - The current status of the document
    /// * `total_amount` - The document's total amount (must be present)
    /// * `issue_date` - The document's issue date (must be present)
    /// * `approved_by` - The user approving the document
    ///
    /// # Returns
    /// * `Ok(LifecycleAction::Approve)` if the transition is valid
    /// * `Err(LifecycleError::InvalidTransition)` if not in Pending status
    /// * `Err(LifecycleError::MissingTotalAmount)` / `MissingIssueDate` if
    ///   the approval preconditions do not hold
    pub fn approve(
        current_status: DocumentStatus,
        total_amount: Option<Decimal>,
        issue_date: Option<NaiveDate>,
        approved_by: Uuid,
    ) -> Result<LifecycleAction, LifecycleError> {
        if current_status != DocumentStatus::Pending {
            return Err(LifecycleError::InvalidTransition {
                from: current_status,
                to: DocumentStatus::Approved,
            });
        }
        if total_amount.is_none() {
            return Err(LifecycleError::MissingTotalAmount);
        }
        if issue_date.is_none() {
            return Err(LifecycleError::MissingIssueDate);
        }

        Ok(LifecycleAction::Approve {
            new_status: DocumentStatus::Approved,
            approved_by,
            approved_at: Utc::now(),
        })
    }

    /// Reject a pending document.
    ///
    /// # Arguments
    /// * `current_status` - The current status of the document
    /// * `rejected_by` - The user rejecting the document
    /// * `rejection_reason` - The reason for rejection (required)
    ///
    /// # Returns
    /// * `Ok(LifecycleAction::Reject)` if the transition is valid
    /// * `Err(LifecycleError::InvalidTransition)` if not in Pending status
    /// * `Err(LifecycleError::RejectionReasonRequired)` if reason is empty
    pub fn reject(
        current_status: DocumentStatus,
        rejected_by: Uuid,
        rejection_reason: String,
    ) -> Result<LifecycleAction, LifecycleError> {
        if rejection_reason.trim().is_empty() {
            return Err(LifecycleError::RejectionReasonRequired);
        }

        match current_status {
            DocumentStatus::Pending => Ok(LifecycleAction::Reject {
                new_status: DocumentStatus::Rejected,
                rejected_by,
                rejected_at: Utc::now(),
                rejection_reason,
            }),
            _ => Err(LifecycleError::InvalidTransition {
                from: current_status,
                to: DocumentStatus::Rejected,
            }),
        }
    }

    /// Hand-edit a pending document.
    ///
    /// Editing marks the document as manually reviewed: review level
    /// becomes `Manual` and any automatic approval claim is withdrawn.
    /// The status itself does not change.
    ///
    /// # Returns
    /// * `Ok(LifecycleAction::Edit)` if the document is editable
    /// * `Err(LifecycleError::NotEditable)` otherwise
    pub fn edit(
        current_status: DocumentStatus,
        edited_by: Uuid,
    ) -> Result<LifecycleAction, LifecycleError> {
        if !current_status.is_editable() {
            return Err(LifecycleError::NotEditable {
                status: current_status,
            });
        }

        Ok(LifecycleAction::Edit {
            review_level: ReviewLevel::Manual,
            reviewed_by: edited_by,
            edited_at: Utc::now(),
        })
    }

    /// Archive an approved or rejected document.
    ///
    /// Archived documents are retained and excluded from default active
    /// views; they are never deleted.
    ///
    /// # Returns
    /// * `Ok(LifecycleAction::Archive)` if the document is archivable
    /// * `Err(LifecycleError::NotArchivable)` if still pending
    /// * `Err(LifecycleError::AlreadyArchived)` if already archived
    pub fn archive(
        current_status: DocumentStatus,
        is_archived: bool,
        archived_by: Uuid,
    ) -> Result<LifecycleAction, LifecycleError> {
        if !current_status.is_terminal() {
            return Err(LifecycleError::NotArchivable {
                status: current_status,
            });
        }
        if is_archived {
            return Err(LifecycleError::AlreadyArchived);
        }

        Ok(LifecycleAction::Archive {
            archived_by,
            archived_at: Utc::now(),
        })
    }

    /// Restore an archived document.
    ///
    /// Clears the archive flag and metadata; all other fields, including
    /// the terminal status, are untouched.
    ///
    /// # Returns
    /// * `Ok(LifecycleAction::Unarchive)` if the document is archived
    /// * `Err(LifecycleError::NotArchived)` otherwise
    pub fn unarchive(is_archived: bool) -> Result<LifecycleAction, LifecycleError> {
        if !is_archived {
            return Err(LifecycleError::NotArchived);
        }

        Ok(LifecycleAction::Unarchive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn issue_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    #[test]
    fn test_approve_from_pending() {
        let user_id = Uuid::new_v4();
        let result = LifecycleService::approve(
            DocumentStatus::Pending,
            Some(dec!(121.00)),
            Some(issue_date()),
            user_id,
        );
        let action = result.unwrap();
        assert_eq!(action.new_status(), Some(DocumentStatus::Approved));
        if let LifecycleAction::Approve { approved_by, .. } = action {
            assert_eq!(approved_by, user_id);
        } else {
            panic!("Expected Approve action");
        }
    }

    #[test]
    fn test_approve_without_total_fails() {
        let result = LifecycleService::approve(
            DocumentStatus::Pending,
            None,
            Some(issue_date()),
            Uuid::new_v4(),
        );
        assert!(matches!(result, Err(LifecycleError::MissingTotalAmount)));
    }

    #[test]
    fn test_approve_without_issue_date_fails() {
        let result = LifecycleService::approve(
            DocumentStatus::Pending,
            Some(dec!(121.00)),
            None,
            Uuid::new_v4(),
        );
        assert!(matches!(result, Err(LifecycleError::MissingIssueDate)));
    }

    #[test]
    fn test_approve_from_terminal_states_fails() {
        for status in [DocumentStatus::Approved, DocumentStatus::Rejected] {
            let result = LifecycleService::approve(
                status,
                Some(dec!(121.00)),
                Some(issue_date()),
                Uuid::new_v4(),
            );
            assert!(matches!(
                result,
                Err(LifecycleError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn test_reject_from_pending() {
        let result = LifecycleService::reject(
            DocumentStatus::Pending,
            Uuid::new_v4(),
            "Illegible totals".to_string(),
        );
        assert_eq!(result.unwrap().new_status(), Some(DocumentStatus::Rejected));
    }

    #[test]
    fn test_reject_empty_reason_fails() {
        let result =
            LifecycleService::reject(DocumentStatus::Pending, Uuid::new_v4(), "   ".to_string());
        assert!(matches!(
            result,
            Err(LifecycleError::RejectionReasonRequired)
        ));
    }

    #[test]
    fn test_reject_from_approved_fails() {
        let result = LifecycleService::reject(
            DocumentStatus::Approved,
            Uuid::new_v4(),
            "too late".to_string(),
        );
        assert!(matches!(
            result,
            Err(LifecycleError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_edit_only_while_pending() {
        let user_id = Uuid::new_v4();
        let action = LifecycleService::edit(DocumentStatus::Pending, user_id).unwrap();
        // Editing never changes the status.
        assert_eq!(action.new_status(), None);
        if let LifecycleAction::Edit {
            review_level,
            reviewed_by,
            ..
        } = action
        {
            assert_eq!(review_level, ReviewLevel::Manual);
            assert_eq!(reviewed_by, user_id);
        } else {
            panic!("Expected Edit action");
        }

        for status in [DocumentStatus::Approved, DocumentStatus::Rejected] {
            assert!(matches!(
                LifecycleService::edit(status, user_id),
                Err(LifecycleError::NotEditable { .. })
            ));
        }
    }

    #[test]
    fn test_archive_requires_terminal_status() {
        assert!(matches!(
            LifecycleService::archive(DocumentStatus::Pending, false, Uuid::new_v4()),
            Err(LifecycleError::NotArchivable { .. })
        ));

        for status in [DocumentStatus::Approved, DocumentStatus::Rejected] {
            assert!(LifecycleService::archive(status, false, Uuid::new_v4()).is_ok());
        }
    }

    #[test]
    fn test_archive_twice_fails() {
        let result = LifecycleService::archive(DocumentStatus::Approved, true, Uuid::new_v4());
        assert!(matches!(result, Err(LifecycleError::AlreadyArchived)));
    }

    #[test]
    fn test_unarchive_requires_archived() {
        assert!(LifecycleService::unarchive(true).is_ok());
        assert!(matches!(
            LifecycleService::unarchive(false),
            Err(LifecycleError::NotArchived)
        ));
    }
}
