//! Branch structure: entries indexed by emitted position

use super::entry::BranchEntry;
use serde::Serialize;
use std::fmt;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BranchStructure {
    entries: Vec<BranchEntry>,
}

impl BranchStructure {
    pub fn new(entries: Vec<BranchEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BranchEntry> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut BranchEntry> {
        self.entries.get_mut(index)
    }

    pub fn entries(&self) -> &[BranchEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BranchEntry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, BranchEntry> {
        self.entries.iter_mut()
    }

    /// First branch at or after `start`
    pub fn next_branch(&self, start: usize) -> Option<usize> {
        (start..self.entries.len()).find(|&i| self.entries[i].is_branch())
    }

    pub fn branch_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_branch()).count()
    }

    /// Structure length without delay slots
    pub fn length(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_delay_slot()).count()
    }

    /// Drop every trace and computed coverage
    pub fn clear_traces(&mut self) {
        for entry in &mut self.entries {
            entry.trace_mut().clear();
            entry.set_block_coverage(None);
            entry.set_slot_coverage(None);
        }
    }
}

impl Index<usize> for BranchStructure {
    type Output = BranchEntry;

    fn index(&self, index: usize) -> &BranchEntry {
        &self.entries[index]
    }
}

impl IndexMut<usize> for BranchStructure {
    fn index_mut(&mut self, index: usize) -> &mut BranchEntry {
        &mut self.entries[index]
    }
}

impl fmt::Display for BranchStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            writeln!(f, "{i}: {entry}")?;
        }
        Ok(())
    }
}
