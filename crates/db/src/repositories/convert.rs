//! Conversions between core domain enums and db active enums.

use docuflow_core::document::{DocumentStatus, DocumentType, Flow};
use docuflow_core::review::ReviewLevel;

use crate::entities::sea_orm_active_enums as db;

pub(crate) fn status_to_db(status: DocumentStatus) -> db::DocumentStatus {
    match status {
        DocumentStatus::Pending => db::DocumentStatus::Pending,
        DocumentStatus::Approved => db::DocumentStatus::Approved,
        DocumentStatus::Rejected => db::DocumentStatus::Rejected,
    }
}

pub(crate) fn status_to_core(status: &db::DocumentStatus) -> DocumentStatus {
    match status {
        db::DocumentStatus::Pending => DocumentStatus::Pending,
        db::DocumentStatus::Approved => DocumentStatus::Approved,
        db::DocumentStatus::Rejected => DocumentStatus::Rejected,
    }
}

pub(crate) fn type_to_db(doc_type: DocumentType) -> db::DocumentType {
    match doc_type {
        DocumentType::Invoice => db::DocumentType::Invoice,
        DocumentType::Delivery => db::DocumentType::Delivery,
        DocumentType::CorrectedInvoice => db::DocumentType::CorrectedInvoice,
    }
}

pub(crate) fn type_to_core(doc_type: &db::DocumentType) -> DocumentType {
    match doc_type {
        db::DocumentType::Invoice => DocumentType::Invoice,
        db::DocumentType::Delivery => DocumentType::Delivery,
        db::DocumentType::CorrectedInvoice => DocumentType::CorrectedInvoice,
    }
}

pub(crate) fn flow_to_db(flow: Flow) -> db::DocumentFlow {
    match flow {
        Flow::In => db::DocumentFlow::In,
        Flow::Out => db::DocumentFlow::Out,
        Flow::Unknown => db::DocumentFlow::Unknown,
    }
}

pub(crate) fn flow_to_core(flow: &db::DocumentFlow) -> Flow {
    match flow {
        db::DocumentFlow::In => Flow::In,
        db::DocumentFlow::Out => Flow::Out,
        db::DocumentFlow::Unknown => Flow::Unknown,
    }
}

pub(crate) fn level_to_db(level: ReviewLevel) -> db::ReviewLevel {
    match level {
        ReviewLevel::Auto => db::ReviewLevel::Auto,
        ReviewLevel::Recommended => db::ReviewLevel::Recommended,
        ReviewLevel::Required => db::ReviewLevel::Required,
        ReviewLevel::Manual => db::ReviewLevel::Manual,
    }
}

pub(crate) fn level_to_core(level: &db::ReviewLevel) -> ReviewLevel {
    match level {
        db::ReviewLevel::Auto => ReviewLevel::Auto,
        db::ReviewLevel::Recommended => ReviewLevel::Recommended,
        db::ReviewLevel::Required => ReviewLevel::Required,
        db::ReviewLevel::Manual => ReviewLevel::Manual,
    }
}
