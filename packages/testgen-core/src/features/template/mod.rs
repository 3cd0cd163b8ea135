//! Section / template composition
//!
//! - `ports`          : `TemplateIterator` structural enumerator seam
//! - `domain`         : instruction equivalence classes
//! - `application`    : `Section`, `Template`, situation odometer
//! - `infrastructure` : sequence and product structural enumerators

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{Section, SituationIterator, Template};
pub use domain::{EquivalenceClass, InstructionClasses};
pub use infrastructure::{ProductTemplateIterator, SequenceTemplateIterator};
pub use ports::TemplateIterator;
