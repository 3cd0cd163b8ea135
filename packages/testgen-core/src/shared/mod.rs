//! Shared module - Common types and utilities
//!
//! Types every feature slice needs: the instruction/program model, the
//! situation seam and the opaque processor/context collaborators.

#[macro_use]
pub mod macros;
pub mod models;

// Re-exports for convenience
pub use models::*;
