//! Canonical counterparty identity.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building a company identity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// Neither a usable name nor a usable tax id was supplied.
    #[error("Company identity cannot be resolved: both name and tax id are empty")]
    Unresolvable,
}

/// Normalizes a tax id: whitespace and hyphens stripped, upper-cased.
///
/// Returns `None` when nothing remains, so an empty tax id is treated
/// as absent rather than as a matchable value.
#[must_use]
pub fn normalize_tax_id(tax_id: &str) -> Option<String> {
    let normalized: String = tax_id
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_uppercase();

    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Normalizes a company name: trimmed, empty treated as absent.
#[must_use]
pub fn normalize_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// A normalized counterparty identity.
///
/// At least one of name or tax id is guaranteed present after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyIdentity {
    /// Trimmed display name, if any.
    pub name: Option<String>,
    /// Canonical tax id, if any.
    pub tax_id: Option<String>,
}

impl CompanyIdentity {
    /// Builds an identity from raw extracted fields.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Unresolvable` when both fields normalize
    /// to absent.
    pub fn new(name: &str, tax_id: &str) -> Result<Self, IdentityError> {
        let identity = Self {
            name: normalize_name(name),
            tax_id: normalize_tax_id(tax_id),
        };

        if identity.name.is_none() && identity.tax_id.is_none() {
            return Err(IdentityError::Unresolvable);
        }

        Ok(identity)
    }
}

/// Role flags for a counterparty, derived from document flow.
///
/// Flags are monotonic: once a company has acted as a provider or a
/// customer the flag is never cleared by resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRoles {
    /// The company supplies goods or services (money flows in).
    pub is_provider: bool,
    /// The company buys goods or services (money flows out).
    pub is_customer: bool,
}

impl CompanyRoles {
    /// Merges requested roles into existing ones, never downgrading.
    #[must_use]
    pub const fn upgraded_with(self, requested: Self) -> Self {
        Self {
            is_provider: self.is_provider || requested.is_provider,
            is_customer: self.is_customer || requested.is_customer,
        }
    }
}
