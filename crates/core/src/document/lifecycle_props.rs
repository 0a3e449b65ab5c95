//! Property-based tests for LifecycleService.
//!
//! These tests validate the transition guards over randomized inputs
//! using proptest.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::document::error::LifecycleError;
use crate::document::lifecycle::{LifecycleAction, LifecycleService};
use crate::document::types::DocumentStatus;
use crate::review::types::ReviewLevel;

/// Strategy for generating random DocumentStatus values.
fn arb_status() -> impl Strategy<Value = DocumentStatus> {
    prop_oneof![
        Just(DocumentStatus::Pending),
        Just(DocumentStatus::Approved),
        Just(DocumentStatus::Rejected),
    ]
}

/// Strategy for generating random UUIDs.
fn arb_uuid() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

/// Strategy for generating optional currency amounts.
fn arb_amount() -> impl Strategy<Value = Option<Decimal>> {
    prop_oneof![
        Just(None),
        (1i64..=10_000_000i64).prop_map(|cents| Some(Decimal::new(cents, 2))),
    ]
}

/// Strategy for generating optional issue dates.
fn arb_date() -> impl Strategy<Value = Option<NaiveDate>> {
    prop_oneof![
        Just(None),
        (0u32..=3650u32).prop_map(|offset| {
            NaiveDate::from_ymd_opt(2020, 1, 1).map(|d| d + chrono::Days::new(u64::from(offset)))
        }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Approval succeeds exactly when the document is pending and both
    /// preconditions hold; the action always targets Approved.
    #[test]
    fn prop_approve_guards(
        status in arb_status(),
        total in arb_amount(),
        date in arb_date(),
        user_id in arb_uuid()
    ) {
        let result = LifecycleService::approve(status, total, date, user_id);
        let should_succeed =
            status == DocumentStatus::Pending && total.is_some() && date.is_some();
        prop_assert_eq!(result.is_ok(), should_succeed);
        if let Ok(action) = result {
            prop_assert_eq!(action.new_status(), Some(DocumentStatus::Approved));
        }
    }

    /// Rejection never succeeds outside Pending, and never with a blank reason.
    #[test]
    fn prop_reject_guards(
        status in arb_status(),
        user_id in arb_uuid(),
        reason in "[ a-zA-Z0-9]{0,40}"
    ) {
        let result = LifecycleService::reject(status, user_id, reason.clone());
        if reason.trim().is_empty() {
            prop_assert!(matches!(result, Err(LifecycleError::RejectionReasonRequired)));
        } else if status == DocumentStatus::Pending {
            prop_assert!(result.is_ok());
        } else {
            let is_invalid_transition =
                matches!(result, Err(LifecycleError::InvalidTransition { .. }));
            prop_assert!(is_invalid_transition);
        }
    }

    /// Editing succeeds only while pending and always demotes to Manual.
    #[test]
    fn prop_edit_sets_manual_level(status in arb_status(), user_id in arb_uuid()) {
        let result = LifecycleService::edit(status, user_id);
        prop_assert_eq!(result.is_ok(), status == DocumentStatus::Pending);
        if let Ok(LifecycleAction::Edit { review_level, .. }) = result {
            prop_assert_eq!(review_level, ReviewLevel::Manual);
        }
    }

    /// Archive / unarchive guards: archive needs a terminal, non-archived
    /// document; unarchive needs an archived one. The pair is inverse.
    #[test]
    fn prop_archive_unarchive_guards(
        status in arb_status(),
        is_archived in any::<bool>(),
        user_id in arb_uuid()
    ) {
        let archive = LifecycleService::archive(status, is_archived, user_id);
        prop_assert_eq!(archive.is_ok(), status.is_terminal() && !is_archived);

        let unarchive = LifecycleService::unarchive(is_archived);
        prop_assert_eq!(unarchive.is_ok(), is_archived);
    }
}
