//! Branch structure enumeration
//!
//! Hexagonal layout:
//! - `ports`          : `BranchTraceSituation` seam and its shared state
//! - `domain`         : structures, entries, traces, executions
//! - `application`    : structure odometer, trace search, coverage construction
//! - `infrastructure` : branch template iterator, counter situation

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{
    walk, BranchStructureIterator, BranchTraceConstructor, BranchTraceIterator,
    StructureClasses, WalkStep,
};
pub use domain::{
    BranchEntry, BranchEntryKind, BranchExecution, BranchSegment, BranchStructure, BranchTrace,
};
pub use infrastructure::{BranchTemplateIterator, CounterBranchSituation};
pub use ports::{attach, BranchTraceLookup, BranchTraceSituation, BranchTraceState};
