//! Branch trace search
//!
//! # Algorithm
//! Depth-first symbolic execution of a branch structure. Starting from the
//! first branch, every reached branch gets one more execution (random
//! outcome for conditional branches, taken for unconditional ones) and the
//! walk follows the outcome to the next branch. Reaching the end of the
//! structure completes a trace; reaching a branch that already has
//! `max_branch_execution` executions is a dead end.
//!
//! Backtracking pops the most recent execution and flips its outcome; an
//! execution that was already flipped is removed and the search pops
//! further. The search ends when the stack is empty.
//!
//! Every completed trace must also pass coverage construction, otherwise
//! the search backtracks from it as from a dead end.
//!
//! # Complexity
//! At most `2^(branches * max_branch_execution)` candidates; each costs one
//! walk plus coverage construction.

use super::trace_constructor::BranchTraceConstructor;
use crate::config::BranchTraceConfig;
use crate::features::branch::domain::{BranchExecution, BranchStructure};
use crate::features::iteration::{BoxedEnumerator, Enumerator};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Enumerates the feasible execution traces of one branch structure
#[derive(Debug, Clone)]
pub struct BranchTraceIterator {
    structure: BranchStructure,
    max_branch_execution: usize,
    max_execution_traces: Option<usize>,
    constructor: BranchTraceConstructor,
    seed: u64,
    rng: StdRng,
    /// Next branch to execute; `None` once the end is reached
    current: Option<usize>,
    /// Branch positions in execution order, one per recorded execution
    stack: Vec<usize>,
    has_branches: bool,
    trace_count: usize,
    has_value: bool,
}

impl BranchTraceIterator {
    pub fn new(structure: BranchStructure, max_branch_execution: usize) -> Self {
        assert!(
            max_branch_execution > 0,
            "a branch executes at least once"
        );
        Self {
            structure,
            max_branch_execution,
            max_execution_traces: None,
            constructor: BranchTraceConstructor::new(),
            seed: 0,
            rng: StdRng::seed_from_u64(0),
            current: None,
            stack: Vec::new(),
            has_branches: false,
            trace_count: 0,
            has_value: false,
        }
    }

    pub fn from_config(structure: BranchStructure, config: &BranchTraceConfig, seed: u64) -> Self {
        Self::new(structure, config.max_branch_execution)
            .with_max_execution_traces(config.max_execution_traces)
            .with_constructor(BranchTraceConstructor::from_config(config))
            .with_seed(seed)
    }

    /// Cap the number of traces returned (call `init()` afterwards)
    pub fn with_max_execution_traces(mut self, max: Option<usize>) -> Self {
        self.max_execution_traces = max;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_constructor(mut self, constructor: BranchTraceConstructor) -> Self {
        self.constructor = constructor;
        self
    }

    /// Structure carrying the current traces and coverage
    pub fn structure(&self) -> &BranchStructure {
        &self.structure
    }

    /// Traces returned since the last `init()`
    pub fn trace_count(&self) -> usize {
        self.trace_count
    }

    /// Decide where execution continues after the latest execution of
    /// the branch at `index`
    fn handle_branch(&mut self, index: usize) {
        let entry = &self.structure[index];
        let taken = entry
            .trace()
            .last()
            .is_some_and(BranchExecution::condition);
        let target = if taken { entry.label() } else { index + 1 };
        self.current = self.structure.next_branch(target);
    }

    /// Execute forward until the end (`true`) or a dead end (`false`)
    fn extend(&mut self) -> bool {
        while let Some(index) = self.current {
            let entry = &self.structure[index];
            if entry.trace().len() >= self.max_branch_execution {
                trace_step!(branch = index, "execution bound reached");
                return false;
            }

            let execution = if entry.is_conditional_branch() {
                BranchExecution::conditional(&mut self.rng)
            } else {
                BranchExecution::unconditional()
            };

            if let Some(entry) = self.structure.get_mut(index) {
                entry.trace_mut().push(execution);
            }
            self.stack.push(index);
            self.handle_branch(index);
        }
        true
    }

    /// Flip the most recent flippable execution; `false` when the search
    /// space is exhausted
    fn backtrack(&mut self) -> bool {
        while let Some(&index) = self.stack.last() {
            let Some(entry) = self.structure.get_mut(index) else {
                return false;
            };
            let trace = entry.trace_mut();
            let flipped = match trace.last_mut() {
                Some(execution) if execution.has_value() => {
                    execution.next();
                    execution.has_value()
                }
                _ => false,
            };

            if flipped {
                trace_step!(branch = index, "flip");
                self.handle_branch(index);
                return true;
            }

            trace.remove_last();
            self.stack.pop();
        }
        false
    }

    /// Find the next trace that passes coverage construction
    fn search(&mut self, resume: bool) -> bool {
        let mut extend = resume;
        loop {
            if !extend && !self.backtrack() {
                tracing::debug!(traces = self.trace_count, "trace search exhausted");
                return false;
            }
            extend = false;

            if self.extend() {
                if self
                    .constructor
                    .construct(&mut self.structure, &mut self.rng)
                {
                    return true;
                }
                tracing::debug!(
                    structure = %self.structure,
                    "trace rejected by coverage construction"
                );
            }
        }
    }
}

impl Enumerator for BranchTraceIterator {
    type Item = BranchStructure;

    fn init(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.structure.clear_traces();
        self.stack.clear();
        self.trace_count = 0;

        self.current = self.structure.next_branch(0);
        self.has_branches = self.current.is_some();

        self.has_value = if self.has_branches {
            self.search(true)
        } else {
            // nothing to search; coverage of a branch-free structure is empty
            self.constructor
                .construct(&mut self.structure, &mut self.rng)
        };

        if self.has_value {
            self.trace_count = 1;
        }
    }

    fn has_value(&self) -> bool {
        self.has_value
    }

    fn value(&self) -> BranchStructure {
        assert!(self.has_value, "value() on exhausted branch trace iterator");
        self.structure.clone()
    }

    fn next(&mut self) {
        assert!(self.has_value, "next() on exhausted branch trace iterator");

        if !self.has_branches {
            self.has_value = false;
            return;
        }
        if self
            .max_execution_traces
            .is_some_and(|max| self.trace_count >= max)
        {
            self.has_value = false;
            return;
        }

        self.has_value = self.search(false);
        if self.has_value {
            self.trace_count += 1;
        }
    }

    fn stop(&mut self) {
        self.has_value = false;
    }

    fn clone_box(&self) -> BoxedEnumerator<BranchStructure> {
        Box::new(self.clone())
    }
}
