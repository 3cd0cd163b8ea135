//! Dependency enumeration (application layer)

mod cross_dependency_iterator;
mod dependency_iterator;
mod section_dependency_iterator;

pub use cross_dependency_iterator::CrossDependencyIterator;
pub use dependency_iterator::DependencyIterator;
pub use section_dependency_iterator::SectionDependencyIterator;
