//! Document lifecycle management.
//!
//! This module implements the guarded state machine a document moves
//! through after ingestion: pending, then approved or rejected, with an
//! orthogonal archived flag on top of the terminal states.
//!
//! # Modules
//!
//! - `types` - Document domain types (status, type, flow)
//! - `error` - Lifecycle-specific error types
//! - `lifecycle` - State transition logic

pub mod error;
pub mod lifecycle;
pub mod types;

#[cfg(test)]
mod lifecycle_props;

pub use error::LifecycleError;
pub use lifecycle::{LifecycleAction, LifecycleService};
pub use types::{DocumentStatus, DocumentType, Flow};
