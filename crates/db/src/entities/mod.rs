//! `SeaORM` entity definitions.

pub mod companies;
pub mod documents;
pub mod sea_orm_active_enums;
pub mod tenants;
