//! Shared errors and configuration for Docuflow.
//!
//! This crate provides common building blocks used across all other crates:
//! - Application-wide error taxonomy
//! - Configuration management, including review thresholds

pub mod config;
pub mod error;

pub use config::{AppConfig, ReviewThresholds};
pub use error::{AppError, AppResult};
