//! Branch execution: one dynamic occurrence of a branch

use rand::Rng;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Set of structure positions (blocks or delay slots)
pub type BranchSegment = BTreeSet<usize>;

/// Outcome of one branch occurrence plus the segments recorded after it
///
/// The outcome has its own two-valued cursor: a conditional branch starts
/// from a random outcome and may be flipped once; an unconditional branch is
/// always taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchExecution {
    conditional: bool,
    condition: bool,
    has_value: bool,
    flipped: bool,
    /// Blocks executed after this occurrence, up to the next occurrence
    block_segment: BranchSegment,
    /// Delay slots executed after this occurrence, up to the next occurrence
    slot_segment: BranchSegment,
    /// Covered blocks executed since the previous occurrence
    block_coverage_count: usize,
    /// Own delay slot executions since the previous occurrence
    slot_coverage_count: usize,
}

impl BranchExecution {
    /// Execution of a conditional branch with a random first outcome
    pub fn conditional<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_condition(true, rng.gen_bool(0.5))
    }

    /// Execution of an unconditional branch (always taken)
    pub fn unconditional() -> Self {
        Self::with_condition(false, true)
    }

    /// Execution with a fixed first outcome
    pub fn with_condition(conditional: bool, condition: bool) -> Self {
        Self {
            conditional,
            condition: condition || !conditional,
            has_value: true,
            flipped: false,
            block_segment: BranchSegment::new(),
            slot_segment: BranchSegment::new(),
            block_coverage_count: 0,
            slot_coverage_count: 0,
        }
    }

    pub fn is_conditional(&self) -> bool {
        self.conditional
    }

    /// Whether the branch is taken
    pub fn condition(&self) -> bool {
        self.condition
    }

    pub fn has_value(&self) -> bool {
        self.has_value
    }

    /// Flip the outcome once; the second call (or any call on an
    /// unconditional execution) exhausts the cursor
    pub fn next(&mut self) {
        assert!(self.has_value, "next() on exhausted branch execution");
        if self.conditional && !self.flipped {
            self.condition = !self.condition;
            self.flipped = true;
        } else {
            self.has_value = false;
        }
    }

    pub fn block_segment(&self) -> &BranchSegment {
        &self.block_segment
    }

    pub fn slot_segment(&self) -> &BranchSegment {
        &self.slot_segment
    }

    pub fn add_block(&mut self, index: usize) {
        self.block_segment.insert(index);
    }

    pub fn add_slot(&mut self, index: usize) {
        self.slot_segment.insert(index);
    }

    /// Forget recorded segments and coverage counts
    pub fn clear(&mut self) {
        self.block_segment.clear();
        self.slot_segment.clear();
        self.block_coverage_count = 0;
        self.slot_coverage_count = 0;
    }

    pub fn block_coverage_count(&self) -> usize {
        self.block_coverage_count
    }

    pub fn slot_coverage_count(&self) -> usize {
        self.slot_coverage_count
    }

    pub fn set_coverage_counts(&mut self, blocks: usize, slots: usize) {
        self.block_coverage_count = blocks;
        self.slot_coverage_count = slots;
    }
}

impl fmt::Display for BranchExecution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.condition { "T" } else { "F" })
    }
}
