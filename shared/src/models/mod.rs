//! Domain models for the Maestranza Inventory Platform

pub mod kit;
pub mod movement;
pub mod purchase_order;
pub mod user;

pub use kit::*;
pub use movement::*;
pub use purchase_order::*;
pub use user::*;
