//! Company resolver: maps extracted counterparty fields to a canonical
//! company row, safe under concurrent ingestion.

use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QuerySelect, Set, SqlErr, TransactionTrait,
};
use thiserror::Error;
use uuid::Uuid;

use docuflow_core::company::{CompanyIdentity, CompanyRoles, IdentityError};
use docuflow_shared::error::AppError;

use crate::entities::companies;

/// Errors raised while resolving a company.
#[derive(Debug, Error)]
pub enum CompanyError {
    /// Neither a usable name nor a usable tax id was supplied.
    #[error(transparent)]
    Identity(#[from] IdentityError),
    /// A concurrent insert won the unique tax id race. The caller's
    /// retry re-runs the lookup, which now finds the winner's row.
    #[error("Concurrent company creation detected, retry the lookup")]
    CreationRace,
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl From<CompanyError> for AppError {
    fn from(err: CompanyError) -> Self {
        match err {
            CompanyError::Identity(e) => Self::Validation(e.to_string()),
            CompanyError::CreationRace => {
                Self::Conflict("Concurrent company creation".to_string())
            }
            CompanyError::Database(msg) => Self::Database(msg),
        }
    }
}

/// Raw counterparty fields as extracted from a document.
#[derive(Debug, Clone)]
pub struct ResolveCompanyInput {
    /// Tenant owning the company.
    pub tenant_id: Uuid,
    /// Extracted company name, possibly empty.
    pub name: String,
    /// Extracted tax id, possibly empty.
    pub tax_id: String,
    /// Roles implied by the document's flow.
    pub roles: CompanyRoles,
}

/// Resolves counterparties to canonical company rows.
#[derive(Debug, Clone)]
pub struct CompanyResolver {
    db: DatabaseConnection,
}

impl CompanyResolver {
    /// Creates a new company resolver.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Resolves a counterparty to an existing or newly created company.
    ///
    /// Matching is by canonical tax id first; when there is no tax id
    /// or the tax id finds nothing, by case-insensitive name. Role
    /// flags on a matched company are upgraded but never cleared.
    /// Losers of the tax id creation race are retried once, after
    /// which the winner's row is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Both name and tax id normalize to empty
    /// - Database operation fails
    pub async fn resolve(
        &self,
        input: &ResolveCompanyInput,
    ) -> Result<companies::Model, CompanyError> {
        match self.resolve_once(input).await {
            Err(CompanyError::CreationRace) => {
                tracing::debug!(
                    tenant_id = %input.tenant_id,
                    "lost company creation race, retrying lookup"
                );
                self.resolve_once(input).await
            }
            other => other,
        }
    }

    async fn resolve_once(
        &self,
        input: &ResolveCompanyInput,
    ) -> Result<companies::Model, CompanyError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CompanyError::Database(e.to_string()))?;

        let company = Self::resolve_in(&txn, input).await?;

        txn.commit()
            .await
            .map_err(|e| CompanyError::Database(e.to_string()))?;

        Ok(company)
    }

    /// Resolves within a caller-owned transaction.
    ///
    /// Used by document ingestion so company creation commits or rolls
    /// back together with the document row. A `CreationRace` error
    /// poisons the transaction; the caller must roll back and retry
    /// the whole transaction.
    pub(crate) async fn resolve_in(
        txn: &DatabaseTransaction,
        input: &ResolveCompanyInput,
    ) -> Result<companies::Model, CompanyError> {
        let identity = CompanyIdentity::new(&input.name, &input.tax_id)?;

        let existing = Self::find_match(txn, input.tenant_id, &identity).await?;

        if let Some(company) = existing {
            return Self::upgrade_roles(txn, company, input.roles).await;
        }

        Self::insert(txn, input.tenant_id, &identity, input.roles).await
    }

    /// Looks up a match under `FOR UPDATE` so concurrent role upgrades
    /// serialize instead of clobbering each other.
    ///
    /// Resolution order: exact (tenant, tax id); when there is no tax
    /// id or it finds nothing, case-insensitive exact (tenant, name).
    async fn find_match(
        txn: &DatabaseTransaction,
        tenant_id: Uuid,
        identity: &CompanyIdentity,
    ) -> Result<Option<companies::Model>, CompanyError> {
        if let Some(tax_id) = &identity.tax_id {
            let by_tax_id = companies::Entity::find()
                .filter(companies::Column::TenantId.eq(tenant_id))
                .filter(companies::Column::TaxId.eq(tax_id.as_str()))
                .lock_exclusive()
                .one(txn)
                .await
                .map_err(|e| CompanyError::Database(e.to_string()))?;
            if by_tax_id.is_some() {
                return Ok(by_tax_id);
            }
        }

        let Some(name) = &identity.name else {
            return Ok(None);
        };

        companies::Entity::find()
            .filter(companies::Column::TenantId.eq(tenant_id))
            .filter(Expr::expr(Func::lower(Expr::col(companies::Column::Name))).eq(name.to_lowercase()))
            .lock_exclusive()
            .one(txn)
            .await
            .map_err(|e| CompanyError::Database(e.to_string()))
    }

    async fn upgrade_roles(
        txn: &DatabaseTransaction,
        company: companies::Model,
        requested: CompanyRoles,
    ) -> Result<companies::Model, CompanyError> {
        let current = CompanyRoles {
            is_provider: company.is_provider,
            is_customer: company.is_customer,
        };
        let upgraded = current.upgraded_with(requested);

        if upgraded == current {
            return Ok(company);
        }

        let mut active: companies::ActiveModel = company.into();
        active.is_provider = Set(upgraded.is_provider);
        active.is_customer = Set(upgraded.is_customer);
        active.updated_at = Set(Utc::now().into());

        active
            .update(txn)
            .await
            .map_err(|e| CompanyError::Database(e.to_string()))
    }

    async fn insert(
        txn: &DatabaseTransaction,
        tenant_id: Uuid,
        identity: &CompanyIdentity,
        roles: CompanyRoles,
    ) -> Result<companies::Model, CompanyError> {
        let now = Utc::now().into();

        // Display name falls back to the tax id when extraction only
        // produced a tax id.
        let name = identity
            .name
            .clone()
            .or_else(|| identity.tax_id.clone())
            .unwrap_or_default();

        let active = companies::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            name: Set(name),
            tax_id: Set(identity.tax_id.clone()),
            is_provider: Set(roles.is_provider),
            is_customer: Set(roles.is_customer),
            created_at: Set(now),
            updated_at: Set(now),
        };

        active.insert(txn).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                CompanyError::CreationRace
            } else {
                CompanyError::Database(e.to_string())
            }
        })
    }
}
