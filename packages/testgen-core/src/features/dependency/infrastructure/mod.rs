//! Dependency type adapters

mod content_dependency;
mod register_dependency;

pub use content_dependency::{ContentDependency, ContentDependencyType, CONTENT_DEPENDENCY};
pub use register_dependency::{RegisterDependency, RegisterDependencyType, REGISTER_DEPENDENCY};
