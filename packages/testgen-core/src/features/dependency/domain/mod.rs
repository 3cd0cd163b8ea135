//! Dependency domain models

mod layout;
mod link;

pub use layout::{ConsistencyView, DependencyIndex, OperandLayout};
pub use link::DependencyLink;
