//! Shared types and models for the Maestranza Inventory Platform
//!
//! This crate contains domain types shared between the backend services,
//! the report exporters and the test suites.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
