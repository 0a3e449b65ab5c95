//! Document repository: ingestion and guarded lifecycle transitions.

use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction,
    EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
    TransactionTrait,
};
use thiserror::Error;
use uuid::Uuid;

use docuflow_core::company::CompanyRoles;
use docuflow_core::document::{
    DocumentStatus, DocumentType, Flow, LifecycleAction, LifecycleError, LifecycleService,
};
use docuflow_core::review::{ConfidenceScores, ReviewClassifier, ReviewLevel};
use docuflow_core::tax::{parse_amount, TaxBreakdown};
use docuflow_shared::config::ReviewThresholds;
use docuflow_shared::error::AppError;

use crate::entities::{companies, documents};
use crate::repositories::company::{CompanyError, CompanyResolver, ResolveCompanyInput};
use crate::repositories::convert::{
    flow_to_db, level_to_db, status_to_core, status_to_db, type_to_db,
};

/// Errors raised by ingestion and document queries.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// A lifecycle precondition was violated.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    /// Company resolution failed.
    #[error(transparent)]
    Company(#[from] CompanyError),
    /// An amount field could not be parsed as money.
    #[error("Unparsable {field} amount: {value:?}")]
    UnparsableAmount {
        /// Name of the offending field.
        field: &'static str,
        /// The raw value as received.
        value: String,
    },
    /// The external id was already ingested for this tenant.
    #[error("Document with external id {0:?} already ingested")]
    DuplicateExternalId(String),
    /// Document not found.
    #[error("Document not found: {0}")]
    NotFound(Uuid),
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Lifecycle(e) => e.into(),
            DocumentError::Company(e) => e.into(),
            DocumentError::UnparsableAmount { .. } => Self::Validation(err.to_string()),
            DocumentError::DuplicateExternalId(_) => Self::Conflict(err.to_string()),
            DocumentError::NotFound(_) => Self::NotFound(err.to_string()),
            DocumentError::Database(msg) => Self::Database(msg),
        }
    }
}

/// One extracted document, as handed over by the extraction pipeline.
///
/// Amounts arrive as raw strings; parsing and tax normalization happen
/// during ingestion so a malformed amount is a validation error, not a
/// silent null.
#[derive(Debug, Clone)]
pub struct IngestDocumentInput {
    /// Tenant the document belongs to.
    pub tenant_id: Uuid,
    /// Pipeline dedupe key, unique per tenant.
    pub external_id: String,
    /// Kind of document.
    pub document_type: DocumentType,
    /// Document number as printed, if extracted.
    pub document_number: Option<String>,
    /// Issue date, if extracted.
    pub issue_date: Option<NaiveDate>,
    /// Money direction.
    pub flow: Flow,
    /// Extracted counterparty name, possibly empty.
    pub company_name: String,
    /// Extracted counterparty tax id, possibly empty.
    pub company_tax_id: String,
    /// Raw base amount.
    pub base_amount: Option<String>,
    /// Raw tax amount.
    pub tax_amount: Option<String>,
    /// Raw tax percentage.
    pub tax_percentage: Option<String>,
    /// Raw total amount.
    pub total_amount: Option<String>,
    /// Per-field extraction confidence scores.
    pub confidence: ConfidenceScores,
}

/// Result of a successful ingestion.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    /// The persisted document.
    pub document: documents::Model,
    /// The resolved counterparty.
    pub company: companies::Model,
}

/// Field updates applied by a hand edit. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct EditDocumentInput {
    /// New document number.
    pub document_number: Option<String>,
    /// New issue date.
    pub issue_date: Option<NaiveDate>,
    /// New raw base amount.
    pub base_amount: Option<String>,
    /// New raw tax amount.
    pub tax_amount: Option<String>,
    /// New raw tax percentage.
    pub tax_percentage: Option<String>,
    /// New raw total amount.
    pub total_amount: Option<String>,
}

/// Which archival slice a query sees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArchiveScope {
    /// Non-archived documents only. The default view.
    #[default]
    Active,
    /// Archived and non-archived alike.
    All,
    /// Archived documents only.
    ArchivedOnly,
}

/// Filter for document listings. Default lists all active documents.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    /// Restrict to a lifecycle status.
    pub status: Option<DocumentStatus>,
    /// Restrict to a review level.
    pub review_level: Option<ReviewLevel>,
    /// Restrict to a document type.
    pub document_type: Option<DocumentType>,
    /// Restrict to a money direction.
    pub flow: Option<Flow>,
    /// Restrict to one counterparty.
    pub company_id: Option<Uuid>,
    /// Issue date lower bound, inclusive.
    pub issued_from: Option<NaiveDate>,
    /// Issue date upper bound, inclusive.
    pub issued_to: Option<NaiveDate>,
    /// Case-insensitive substring match on document number or external id.
    pub search: Option<String>,
    /// Archival slice to query.
    pub archive: ArchiveScope,
}

/// Pending-review dashboard slice.
#[derive(Debug, Clone)]
pub struct PendingSummary {
    /// Pending documents, newest first.
    pub documents: Vec<documents::Model>,
    /// How many of them are at `required` review level.
    pub required_count: u64,
    /// How many of them are at `recommended` review level.
    pub recommended_count: u64,
}

/// Document repository: ingestion, lifecycle transitions, and listings.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: DatabaseConnection,
    thresholds: ReviewThresholds,
}

impl DocumentRepository {
    /// Creates a new document repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, thresholds: ReviewThresholds) -> Self {
        Self { db, thresholds }
    }

    /// Ingests one extracted document.
    ///
    /// Normalizes the tax breakdown, classifies the review level,
    /// resolves the counterparty, and persists the document, all in
    /// one transaction. A lost company creation race rolls the whole
    /// transaction back and retries once.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The external id was already ingested for this tenant
    /// - An amount field cannot be parsed as money
    /// - The counterparty has neither a usable name nor tax id
    /// - The company race persists after the retry
    /// - Database operation fails
    pub async fn ingest(&self, input: &IngestDocumentInput) -> Result<IngestOutcome, DocumentError> {
        match self.ingest_once(input).await {
            Err(DocumentError::Company(CompanyError::CreationRace)) => {
                tracing::debug!(
                    tenant_id = %input.tenant_id,
                    external_id = %input.external_id,
                    "ingestion lost company creation race, retrying"
                );
                self.ingest_once(input).await
            }
            other => other,
        }
    }

    async fn ingest_once(
        &self,
        input: &IngestDocumentInput,
    ) -> Result<IngestOutcome, DocumentError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DocumentError::Database(e.to_string()))?;

        // Dedupe check; the unique constraint still backs the
        // concurrent case at insert time.
        let duplicate = documents::Entity::find()
            .filter(documents::Column::TenantId.eq(input.tenant_id))
            .filter(documents::Column::ExternalId.eq(input.external_id.as_str()))
            .one(&txn)
            .await
            .map_err(|e| DocumentError::Database(e.to_string()))?;
        if duplicate.is_some() {
            return Err(DocumentError::DuplicateExternalId(input.external_id.clone()));
        }

        let company = CompanyResolver::resolve_in(
            &txn,
            &ResolveCompanyInput {
                tenant_id: input.tenant_id,
                name: input.company_name.clone(),
                tax_id: input.company_tax_id.clone(),
                roles: roles_for_flow(input.flow),
            },
        )
        .await?;

        let breakdown = TaxBreakdown::new(
            parse_field("base_amount", input.base_amount.as_deref())?,
            parse_field("tax_amount", input.tax_amount.as_deref())?,
            parse_field("tax_percentage", input.tax_percentage.as_deref())?,
            parse_field("total_amount", input.total_amount.as_deref())?,
        )
        .normalize();

        let level = ReviewClassifier::classify(
            &input.confidence,
            input.document_type.as_str(),
            &self.thresholds,
        );
        let status = level.initial_status();

        let confidence = serde_json::to_value(&input.confidence)
            .map_err(|e| DocumentError::Database(e.to_string()))?;

        let now = Utc::now().into();
        let active = documents::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(input.tenant_id),
            external_id: Set(input.external_id.clone()),
            company_id: Set(Some(company.id)),
            document_type: Set(type_to_db(input.document_type)),
            document_number: Set(input.document_number.clone()),
            issue_date: Set(input.issue_date),
            base_amount: Set(breakdown.base),
            tax_amount: Set(breakdown.tax_amount),
            tax_percentage: Set(breakdown.tax_percentage),
            total_amount: Set(breakdown.total),
            confidence: Set(confidence),
            status: Set(status_to_db(status)),
            review_level: Set(level_to_db(level)),
            flow: Set(flow_to_db(input.flow)),
            // The automatic path records no actor and no timestamp.
            is_auto_approved: Set(level == ReviewLevel::Auto),
            is_archived: Set(false),
            archived_at: Set(None),
            archived_by: Set(None),
            approved_at: Set(None),
            approved_by: Set(None),
            rejected_at: Set(None),
            rejected_by: Set(None),
            rejection_reason: Set(None),
            edited_at: Set(None),
            reviewed_by: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let document = active.insert(&txn).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                DocumentError::DuplicateExternalId(input.external_id.clone())
            } else {
                DocumentError::Database(e.to_string())
            }
        })?;

        txn.commit()
            .await
            .map_err(|e| DocumentError::Database(e.to_string()))?;

        tracing::info!(
            tenant_id = %input.tenant_id,
            document_id = %document.id,
            review_level = %level,
            "document ingested"
        );

        Ok(IngestOutcome { document, company })
    }

    /// Approves a pending document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Document is not found
    /// - Document is not in pending status
    /// - Total amount or issue date is missing
    /// - Database operation fails
    pub async fn approve(
        &self,
        tenant_id: Uuid,
        document_id: Uuid,
        approved_by: Uuid,
    ) -> Result<documents::Model, LifecycleError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LifecycleError::Database(e.to_string()))?;

        let document = Self::fetch_for_update(&txn, tenant_id, document_id).await?;

        let action = LifecycleService::approve(
            status_to_core(&document.status),
            document.total_amount,
            document.issue_date,
            approved_by,
        )?;

        let mut active: documents::ActiveModel = document.into();
        if let LifecycleAction::Approve {
            new_status,
            approved_by,
            approved_at,
        } = action
        {
            active.status = Set(status_to_db(new_status));
            active.approved_by = Set(Some(approved_by));
            active.approved_at = Set(Some(approved_at.into()));
            active.is_auto_approved = Set(false);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| LifecycleError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| LifecycleError::Database(e.to_string()))?;

        Ok(updated)
    }

    /// Rejects a pending document with a reason.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Document is not found
    /// - Document is not in pending status
    /// - The reason is empty
    /// - Database operation fails
    pub async fn reject(
        &self,
        tenant_id: Uuid,
        document_id: Uuid,
        rejected_by: Uuid,
        reason: String,
    ) -> Result<documents::Model, LifecycleError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LifecycleError::Database(e.to_string()))?;

        let document = Self::fetch_for_update(&txn, tenant_id, document_id).await?;

        let action =
            LifecycleService::reject(status_to_core(&document.status), rejected_by, reason)?;

        let mut active: documents::ActiveModel = document.into();
        if let LifecycleAction::Reject {
            new_status,
            rejected_by,
            rejected_at,
            rejection_reason,
        } = action
        {
            active.status = Set(status_to_db(new_status));
            active.rejected_by = Set(Some(rejected_by));
            active.rejected_at = Set(Some(rejected_at.into()));
            active.rejection_reason = Set(Some(rejection_reason));
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| LifecycleError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| LifecycleError::Database(e.to_string()))?;

        Ok(updated)
    }

    /// Hand-edits a pending document.
    ///
    /// Applies the supplied field updates, re-normalizes the tax
    /// breakdown from the merged amounts, and marks the document as
    /// manually reviewed: review level becomes `manual` and any
    /// automatic approval claim is withdrawn.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Document is not found
    /// - Document is not in pending status
    /// - An amount field cannot be parsed as money
    /// - Database operation fails
    pub async fn edit(
        &self,
        tenant_id: Uuid,
        document_id: Uuid,
        edited_by: Uuid,
        input: &EditDocumentInput,
    ) -> Result<documents::Model, DocumentError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DocumentError::Database(e.to_string()))?;

        let document = Self::fetch_for_update(&txn, tenant_id, document_id).await?;

        let action = LifecycleService::edit(status_to_core(&document.status), edited_by)?;

        let breakdown = TaxBreakdown::new(
            merge_amount("base_amount", input.base_amount.as_deref(), document.base_amount)?,
            merge_amount("tax_amount", input.tax_amount.as_deref(), document.tax_amount)?,
            merge_amount(
                "tax_percentage",
                input.tax_percentage.as_deref(),
                document.tax_percentage,
            )?,
            merge_amount("total_amount", input.total_amount.as_deref(), document.total_amount)?,
        )
        .normalize();

        let document_number = input
            .document_number
            .clone()
            .or_else(|| document.document_number.clone());
        let issue_date = input.issue_date.or(document.issue_date);

        let mut active: documents::ActiveModel = document.into();
        active.document_number = Set(document_number);
        active.issue_date = Set(issue_date);
        active.base_amount = Set(breakdown.base);
        active.tax_amount = Set(breakdown.tax_amount);
        active.tax_percentage = Set(breakdown.tax_percentage);
        active.total_amount = Set(breakdown.total);
        if let LifecycleAction::Edit {
            review_level,
            reviewed_by,
            edited_at,
        } = action
        {
            active.review_level = Set(level_to_db(review_level));
            active.is_auto_approved = Set(false);
            active.reviewed_by = Set(Some(reviewed_by));
            active.edited_at = Set(Some(edited_at.into()));
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| DocumentError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| DocumentError::Database(e.to_string()))?;

        Ok(updated)
    }

    /// Archives a terminal document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Document is not found
    /// - Document is still pending, or already archived
    /// - Database operation fails
    pub async fn archive(
        &self,
        tenant_id: Uuid,
        document_id: Uuid,
        archived_by: Uuid,
    ) -> Result<documents::Model, LifecycleError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LifecycleError::Database(e.to_string()))?;

        let document = Self::fetch_for_update(&txn, tenant_id, document_id).await?;

        let action = LifecycleService::archive(
            status_to_core(&document.status),
            document.is_archived,
            archived_by,
        )?;

        let mut active: documents::ActiveModel = document.into();
        if let LifecycleAction::Archive {
            archived_by,
            archived_at,
        } = action
        {
            active.is_archived = Set(true);
            active.archived_by = Set(Some(archived_by));
            active.archived_at = Set(Some(archived_at.into()));
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| LifecycleError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| LifecycleError::Database(e.to_string()))?;

        Ok(updated)
    }

    /// Restores an archived document. Archive metadata is cleared;
    /// every other field keeps its value.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Document is not found
    /// - Document is not archived
    /// - Database operation fails
    pub async fn unarchive(
        &self,
        tenant_id: Uuid,
        document_id: Uuid,
    ) -> Result<documents::Model, LifecycleError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LifecycleError::Database(e.to_string()))?;

        let document = Self::fetch_for_update(&txn, tenant_id, document_id).await?;

        let _action = LifecycleService::unarchive(document.is_archived)?;

        let mut active: documents::ActiveModel = document.into();
        active.is_archived = Set(false);
        active.archived_by = Set(None);
        active.archived_at = Set(None);
        active.updated_at = Set(Utc::now().into());

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| LifecycleError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| LifecycleError::Database(e.to_string()))?;

        Ok(updated)
    }

    /// Fetches one document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not found or the database
    /// operation fails.
    pub async fn get(
        &self,
        tenant_id: Uuid,
        document_id: Uuid,
    ) -> Result<documents::Model, DocumentError> {
        documents::Entity::find_by_id(document_id)
            .filter(documents::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await
            .map_err(|e| DocumentError::Database(e.to_string()))?
            .ok_or(DocumentError::NotFound(document_id))
    }

    /// Lists documents matching a filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(
        &self,
        tenant_id: Uuid,
        filter: &DocumentFilter,
    ) -> Result<Vec<documents::Model>, DocumentError> {
        let mut query = documents::Entity::find()
            .filter(documents::Column::TenantId.eq(tenant_id))
            .filter(archive_condition(filter.archive));

        if let Some(status) = filter.status {
            query = query.filter(documents::Column::Status.eq(status_to_db(status)));
        }
        if let Some(level) = filter.review_level {
            query = query.filter(documents::Column::ReviewLevel.eq(level_to_db(level)));
        }
        if let Some(doc_type) = filter.document_type {
            query = query.filter(documents::Column::DocumentType.eq(type_to_db(doc_type)));
        }
        if let Some(flow) = filter.flow {
            query = query.filter(documents::Column::Flow.eq(flow_to_db(flow)));
        }
        if let Some(company_id) = filter.company_id {
            query = query.filter(documents::Column::CompanyId.eq(company_id));
        }
        if let Some(from) = filter.issued_from {
            query = query.filter(documents::Column::IssueDate.gte(from));
        }
        if let Some(to) = filter.issued_to {
            query = query.filter(documents::Column::IssueDate.lte(to));
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(documents::Column::DocumentNumber)))
                            .like(pattern.clone()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(documents::Column::ExternalId)))
                            .like(pattern),
                    ),
            );
        }

        query
            .order_by(documents::Column::CreatedAt, Order::Desc)
            .all(&self.db)
            .await
            .map_err(|e| DocumentError::Database(e.to_string()))
    }

    /// Pending-review dashboard: active pending documents newest first,
    /// with counts of how many sit at each actionable review level.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn pending_dashboard(&self, tenant_id: Uuid) -> Result<PendingSummary, DocumentError> {
        let filter = DocumentFilter {
            status: Some(DocumentStatus::Pending),
            ..DocumentFilter::default()
        };
        let documents = self.list(tenant_id, &filter).await?;

        let required_count = self.count_pending(tenant_id, ReviewLevel::Required).await?;
        let recommended_count = self
            .count_pending(tenant_id, ReviewLevel::Recommended)
            .await?;

        Ok(PendingSummary {
            documents,
            required_count,
            recommended_count,
        })
    }

    async fn count_pending(
        &self,
        tenant_id: Uuid,
        level: ReviewLevel,
    ) -> Result<u64, DocumentError> {
        documents::Entity::find()
            .filter(documents::Column::TenantId.eq(tenant_id))
            .filter(documents::Column::IsArchived.eq(false))
            .filter(documents::Column::Status.eq(status_to_db(DocumentStatus::Pending)))
            .filter(documents::Column::ReviewLevel.eq(level_to_db(level)))
            .count(&self.db)
            .await
            .map_err(|e| DocumentError::Database(e.to_string()))
    }

    /// Fetches a document under `FOR UPDATE` so concurrent transitions
    /// on the same row serialize.
    async fn fetch_for_update(
        txn: &DatabaseTransaction,
        tenant_id: Uuid,
        document_id: Uuid,
    ) -> Result<documents::Model, LifecycleError> {
        documents::Entity::find_by_id(document_id)
            .filter(documents::Column::TenantId.eq(tenant_id))
            .lock_exclusive()
            .one(txn)
            .await
            .map_err(|e| LifecycleError::Database(e.to_string()))?
            .ok_or(LifecycleError::DocumentNotFound(document_id))
    }
}

/// Role flags implied by a document's money direction.
const fn roles_for_flow(flow: Flow) -> CompanyRoles {
    match flow {
        Flow::In => CompanyRoles {
            is_provider: true,
            is_customer: false,
        },
        Flow::Out => CompanyRoles {
            is_provider: false,
            is_customer: true,
        },
        Flow::Unknown => CompanyRoles {
            is_provider: false,
            is_customer: false,
        },
    }
}

fn archive_condition(scope: ArchiveScope) -> Condition {
    match scope {
        ArchiveScope::Active => Condition::all().add(documents::Column::IsArchived.eq(false)),
        ArchiveScope::All => Condition::all(),
        ArchiveScope::ArchivedOnly => {
            Condition::all().add(documents::Column::IsArchived.eq(true))
        }
    }
}

fn parse_field(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<rust_decimal::Decimal>, DocumentError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    parse_amount(raw).map_err(|_| DocumentError::UnparsableAmount {
        field,
        value: raw.to_string(),
    })
}

/// Applies an optional raw amount edit over a stored value. An absent
/// field or a blank string keeps the stored value; edits never clear
/// an amount.
fn merge_amount(
    field: &'static str,
    edit: Option<&str>,
    current: Option<rust_decimal::Decimal>,
) -> Result<Option<rust_decimal::Decimal>, DocumentError> {
    match edit {
        Some(raw) => match parse_field(field, Some(raw))? {
            Some(value) => Ok(Some(value)),
            None => Ok(current),
        },
        None => Ok(current),
    }
}
