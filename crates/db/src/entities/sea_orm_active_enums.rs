//! `SeaORM` active enums mapping to Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Document lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "document_status")]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Awaiting review.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Accepted.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Rejected.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Kind of financial document.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "document_type")]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Standard invoice.
    #[sea_orm(string_value = "invoice")]
    Invoice,
    /// Delivery note.
    #[sea_orm(string_value = "delivery")]
    Delivery,
    /// Credit/correction note.
    #[sea_orm(string_value = "corrected_invoice")]
    CorrectedInvoice,
}

/// Review level of a document.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "review_level")]
#[serde(rename_all = "lowercase")]
pub enum ReviewLevel {
    /// Approved automatically.
    #[sea_orm(string_value = "auto")]
    Auto,
    /// Review suggested.
    #[sea_orm(string_value = "recommended")]
    Recommended,
    /// Review mandatory.
    #[sea_orm(string_value = "required")]
    Required,
    /// Hand-edited by a reviewer.
    #[sea_orm(string_value = "manual")]
    Manual,
}

/// Direction of money for a document.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "document_flow")]
#[serde(rename_all = "lowercase")]
pub enum DocumentFlow {
    /// Income.
    #[sea_orm(string_value = "in")]
    In,
    /// Expense.
    #[sea_orm(string_value = "out")]
    Out,
    /// Undetermined.
    #[sea_orm(string_value = "unknown")]
    Unknown,
}
