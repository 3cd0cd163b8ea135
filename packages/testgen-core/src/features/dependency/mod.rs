//! Operand dependency enumeration
//!
//! Hexagonal layout:
//! - `ports`          : `DependencyType` / `Dependency` seams
//! - `domain`         : operand layout, instance index, active-link snapshot
//! - `application`    : dependency, section and cross-section iterators
//! - `infrastructure` : register and content dependency types

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{CrossDependencyIterator, DependencyIterator, SectionDependencyIterator};
pub use domain::{ConsistencyView, DependencyIndex, DependencyLink, OperandLayout};
pub use infrastructure::{
    ContentDependency, ContentDependencyType, RegisterDependency, RegisterDependencyType,
};
pub use ports::{Dependency, DependencyType};
