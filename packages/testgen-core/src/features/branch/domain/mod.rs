//! Branch structure model
//!
//! Plain value records: cloning a structure deep-copies every trace and
//! execution.

mod entry;
mod execution;
mod structure;
mod trace;

pub use entry::{BranchEntry, BranchEntryKind};
pub use execution::{BranchExecution, BranchSegment};
pub use structure::BranchStructure;
pub use trace::BranchTrace;
