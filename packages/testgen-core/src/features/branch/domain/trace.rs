//! Branch trace: the executions of one branch along a path

use super::execution::BranchExecution;
use serde::Serialize;
use std::fmt;

/// Executions in dynamic order; grown and shrunk as a stack during search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BranchTrace {
    executions: Vec<BranchExecution>,
}

impl BranchTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, execution: BranchExecution) {
        self.executions.push(execution);
    }

    pub fn remove_last(&mut self) -> Option<BranchExecution> {
        self.executions.pop()
    }

    pub fn last(&self) -> Option<&BranchExecution> {
        self.executions.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut BranchExecution> {
        self.executions.last_mut()
    }

    pub fn get(&self, index: usize) -> Option<&BranchExecution> {
        self.executions.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut BranchExecution> {
        self.executions.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.executions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executions.is_empty()
    }

    pub fn clear(&mut self) {
        self.executions.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BranchExecution> {
        self.executions.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, BranchExecution> {
        self.executions.iter_mut()
    }

    /// Outcome sequence
    pub fn conditions(&self) -> Vec<bool> {
        self.executions.iter().map(BranchExecution::condition).collect()
    }

    /// Number of outcome changes between consecutive executions
    pub fn change_count(&self) -> usize {
        self.executions
            .windows(2)
            .filter(|w| w[0].condition() != w[1].condition())
            .count()
    }
}

impl fmt::Display for BranchTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, execution) in self.executions.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{execution}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_discipline_and_changes() {
        let mut trace = BranchTrace::new();
        trace.push(BranchExecution::with_condition(true, true));
        trace.push(BranchExecution::with_condition(true, false));
        trace.push(BranchExecution::with_condition(true, false));

        assert_eq!(trace.conditions(), vec![true, false, false]);
        assert_eq!(trace.change_count(), 1);
        assert_eq!(trace.to_string(), "[T, F, F]");

        trace.remove_last();
        assert_eq!(trace.len(), 2);
    }
}
