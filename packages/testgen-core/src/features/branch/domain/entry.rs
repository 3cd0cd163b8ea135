//! Branch structure entry

use super::execution::BranchSegment;
use super::trace::BranchTrace;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BranchEntryKind {
    ConditionalBranch,
    UnconditionalBranch,
    DelaySlot,
    BasicBlock,
}

/// Node of a branch structure
///
/// `group` selects the instruction equivalence class the entry is
/// materialized from. `label` and `trace` only mean something for
/// branches; the coverage fields stay `None` until coverage construction
/// fills them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchEntry {
    kind: BranchEntryKind,
    group: usize,
    label: usize,
    trace: BranchTrace,
    block_coverage: Option<BranchSegment>,
    slot_coverage: Option<BranchSegment>,
}

impl BranchEntry {
    fn new(kind: BranchEntryKind, group: usize, label: usize) -> Self {
        Self {
            kind,
            group,
            label,
            trace: BranchTrace::new(),
            block_coverage: None,
            slot_coverage: None,
        }
    }

    pub fn branch(conditional: bool, group: usize, label: usize) -> Self {
        let kind = if conditional {
            BranchEntryKind::ConditionalBranch
        } else {
            BranchEntryKind::UnconditionalBranch
        };
        Self::new(kind, group, label)
    }

    pub fn delay_slot(group: usize) -> Self {
        Self::new(BranchEntryKind::DelaySlot, group, 0)
    }

    pub fn basic_block(group: usize) -> Self {
        Self::new(BranchEntryKind::BasicBlock, group, 0)
    }

    pub fn kind(&self) -> BranchEntryKind {
        self.kind
    }

    pub fn is_branch(&self) -> bool {
        matches!(
            self.kind,
            BranchEntryKind::ConditionalBranch | BranchEntryKind::UnconditionalBranch
        )
    }

    pub fn is_conditional_branch(&self) -> bool {
        self.kind == BranchEntryKind::ConditionalBranch
    }

    pub fn is_delay_slot(&self) -> bool {
        self.kind == BranchEntryKind::DelaySlot
    }

    pub fn is_basic_block(&self) -> bool {
        self.kind == BranchEntryKind::BasicBlock
    }

    pub fn group(&self) -> usize {
        self.group
    }

    /// Target position of a branch
    pub fn label(&self) -> usize {
        self.label
    }

    pub fn trace(&self) -> &BranchTrace {
        &self.trace
    }

    pub fn trace_mut(&mut self) -> &mut BranchTrace {
        &mut self.trace
    }

    pub fn block_coverage(&self) -> Option<&BranchSegment> {
        self.block_coverage.as_ref()
    }

    pub fn slot_coverage(&self) -> Option<&BranchSegment> {
        self.slot_coverage.as_ref()
    }

    pub fn set_block_coverage(&mut self, coverage: Option<BranchSegment>) {
        self.block_coverage = coverage;
    }

    pub fn set_slot_coverage(&mut self, coverage: Option<BranchSegment>) {
        self.slot_coverage = coverage;
    }
}

impl fmt::Display for BranchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            BranchEntryKind::ConditionalBranch => {
                write!(f, "if({}) goto {} {}", self.group, self.label, self.trace)
            }
            BranchEntryKind::UnconditionalBranch => {
                write!(f, "goto({}) {} {}", self.group, self.label, self.trace)
            }
            BranchEntryKind::DelaySlot => write!(f, "slot({})", self.group),
            BranchEntryKind::BasicBlock => write!(f, "block({})", self.group),
        }
    }
}
