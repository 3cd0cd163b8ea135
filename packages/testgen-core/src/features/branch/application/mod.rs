//! Branch enumeration services
//!
//! Structure skeletons, the trace search per skeleton, and coverage
//! construction per trace.

mod structure_iterator;
mod trace_constructor;
mod trace_iterator;
mod walker;

pub use structure_iterator::{BranchStructureIterator, StructureClasses};
pub use trace_constructor::BranchTraceConstructor;
pub use trace_iterator::BranchTraceIterator;
pub use walker::{walk, WalkStep};
