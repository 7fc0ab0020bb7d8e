//! HTTP handlers for the Maestranza Inventory Platform

pub mod alert;
pub mod audit;
pub mod auth;
pub mod batch;
pub mod kit;
pub mod movement;
pub mod price;
pub mod product;
pub mod project;
pub mod purchase_order;
pub mod report;
pub mod settings;
pub mod supplier;

pub use alert::*;
pub use audit::*;
pub use auth::*;
pub use batch::*;
pub use kit::*;
pub use movement::*;
pub use price::*;
pub use product::*;
pub use project::*;
pub use purchase_order::*;
pub use report::*;
pub use settings::*;
pub use supplier::*;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}
