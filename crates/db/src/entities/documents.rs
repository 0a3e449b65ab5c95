//! `SeaORM` Entity for documents table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{DocumentFlow, DocumentStatus, DocumentType, ReviewLevel};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    /// Dedupe key from the extraction pipeline; unique per tenant.
    pub external_id: String,
    /// Weak reference: cleared, not cascaded, when the company goes away.
    pub company_id: Option<Uuid>,
    pub document_type: DocumentType,
    pub document_number: Option<String>,
    pub issue_date: Option<Date>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub base_amount: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub tax_amount: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((7, 2)))", nullable)]
    pub tax_percentage: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub total_amount: Option<Decimal>,
    /// Per-field extraction confidence scores.
    #[sea_orm(column_type = "JsonBinary")]
    pub confidence: Json,
    pub status: DocumentStatus,
    pub review_level: ReviewLevel,
    pub flow: DocumentFlow,
    pub is_auto_approved: bool,
    pub is_archived: bool,
    pub archived_at: Option<DateTimeWithTimeZone>,
    pub archived_by: Option<Uuid>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub approved_by: Option<Uuid>,
    pub rejected_at: Option<DateTimeWithTimeZone>,
    pub rejected_by: Option<Uuid>,
    pub rejection_reason: Option<String>,
    pub edited_at: Option<DateTimeWithTimeZone>,
    pub reviewed_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenants::Entity",
        from = "Column::TenantId",
        to = "super::tenants::Column::Id"
    )]
    Tenants,
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Companies,
}

impl Related<super::tenants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenants.def()
    }
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
