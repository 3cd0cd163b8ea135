//! Structure walker
//!
//! Replays the traces of a structure from position 0. Every branch
//! occurrence consumes the next execution of its trace; the walk ends at
//! the structure end or at a branch whose trace is used up. A branch's own
//! delay slot executes whatever the outcome.

use crate::features::branch::domain::BranchStructure;

/// One event of a walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStep {
    /// `execution`-th occurrence of the branch at `index`
    Branch { index: usize, execution: usize },
    DelaySlot { index: usize },
    BasicBlock { index: usize },
}

/// Walk `structure`, reporting every executed entry to `visit`
pub fn walk<F>(structure: &BranchStructure, mut visit: F)
where
    F: FnMut(WalkStep),
{
    let size = structure.len();
    let mut occurrences = vec![0usize; size];
    let mut i = 0;

    while i < size {
        let entry = &structure[i];

        if entry.is_basic_block() {
            visit(WalkStep::BasicBlock { index: i });
            i += 1;
            continue;
        }
        if entry.is_delay_slot() {
            visit(WalkStep::DelaySlot { index: i });
            i += 1;
            continue;
        }

        let k = occurrences[i];
        let Some(execution) = entry.trace().get(k) else {
            break;
        };
        occurrences[i] += 1;
        visit(WalkStep::Branch {
            index: i,
            execution: k,
        });

        let has_slot = structure.get(i + 1).is_some_and(|e| e.is_delay_slot());
        if has_slot {
            visit(WalkStep::DelaySlot { index: i + 1 });
        }

        i = if execution.condition() {
            entry.label()
        } else if has_slot {
            i + 2
        } else {
            i + 1
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::branch::domain::{BranchEntry, BranchExecution};

    fn steps(structure: &BranchStructure) -> Vec<WalkStep> {
        let mut steps = Vec::new();
        walk(structure, |step| steps.push(step));
        steps
    }

    #[test]
    fn test_loop_is_unrolled_by_trace() {
        // 0: block, 1: if goto 0, 2: block
        let mut structure = BranchStructure::new(vec![
            BranchEntry::basic_block(0),
            BranchEntry::branch(true, 0, 0),
            BranchEntry::basic_block(0),
        ]);
        let trace = structure.get_mut(1).unwrap().trace_mut();
        trace.push(BranchExecution::with_condition(true, true));
        trace.push(BranchExecution::with_condition(true, false));

        assert_eq!(
            steps(&structure),
            vec![
                WalkStep::BasicBlock { index: 0 },
                WalkStep::Branch { index: 1, execution: 0 },
                WalkStep::BasicBlock { index: 0 },
                WalkStep::Branch { index: 1, execution: 1 },
                WalkStep::BasicBlock { index: 2 },
            ]
        );
    }

    #[test]
    fn test_delay_slot_executes_once_per_occurrence() {
        // 0: if goto 3, 1: slot, 2: block, 3: block
        let mut structure = BranchStructure::new(vec![
            BranchEntry::branch(true, 0, 3),
            BranchEntry::delay_slot(0),
            BranchEntry::basic_block(0),
            BranchEntry::basic_block(0),
        ]);
        structure
            .get_mut(0)
            .unwrap()
            .trace_mut()
            .push(BranchExecution::with_condition(true, false));

        assert_eq!(
            steps(&structure),
            vec![
                WalkStep::Branch { index: 0, execution: 0 },
                WalkStep::DelaySlot { index: 1 },
                WalkStep::BasicBlock { index: 2 },
                WalkStep::BasicBlock { index: 3 },
            ]
        );
    }

    #[test]
    fn test_walk_stops_when_trace_is_used_up() {
        let structure = BranchStructure::new(vec![
            BranchEntry::basic_block(0),
            BranchEntry::branch(false, 0, 0),
        ]);
        assert_eq!(steps(&structure), vec![WalkStep::BasicBlock { index: 0 }]);
    }
}
