//! Core business logic for Docuflow.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `tax` - Monetary field normalization and lenient amount parsing
//! - `review` - Confidence-based review level classification
//! - `company` - Counterparty identity normalization
//! - `document` - Document lifecycle state machine
//! - `metrics` - Count and financial rollup computation

pub mod company;
pub mod document;
pub mod metrics;
pub mod review;
pub mod tax;
