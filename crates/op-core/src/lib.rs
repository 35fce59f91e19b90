//! outpost/crates/op-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Outpost.

pub mod authz;
pub mod config;
pub mod error;
pub mod models;
pub mod traits;

// Re-exporting for easier access in other crates
pub use authz::*;
pub use error::*;
pub use models::*;
pub use traits::*;
