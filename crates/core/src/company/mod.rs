//! Counterparty identity normalization.
//!
//! Extraction output spells the same counterparty many ways
//! (`"B-1234-5678"`, `"b 1234 5678"`). This module canonicalizes names
//! and tax ids so the resolver can match them; the find-or-create logic
//! itself lives in the db crate where the locking contract belongs.

pub mod identity;

pub use identity::{CompanyIdentity, CompanyRoles, IdentityError, normalize_name, normalize_tax_id};
