//! Branch structure enumeration
//!
//! # Algorithm
//! Odometer over seven levels, outermost first:
//!
//! | level          | domain                                          |
//! |----------------|-------------------------------------------------|
//! | length         | `min_length..=max_length`                       |
//! | branch number  | `min_branch..=min(max_branch, length)`          |
//! | positions      | k-subsets of `0..length`                        |
//! | labels         | `0..=(length - 1) + (delay slots ? k : 0)`, each branch |
//! | branch classes | one branch class per branch                     |
//! | slot classes   | one delay slot class per branch (delay slots only) |
//! | block classes  | one block class per basic block                 |
//!
//! Advancing a level re-initializes every level below it; a level that
//! cannot be initialized advances the level above it instead.
//!
//! With the consecutive basic block heuristic, positions with more
//! adjacent block pairs than branches are skipped, and labels must target
//! the second block of every adjacent pair. The heuristic bounds the
//! length by `3 * max_branch + 1`.

use crate::config::BranchStructureConfig;
use crate::errors::{GeneratorError, Result};
use crate::features::branch::domain::{BranchEntry, BranchEntryKind, BranchStructure};
use crate::features::iteration::{
    BoxedEnumerator, Enumerator, ProductIterator, RangeIterator, SampleIterator,
};
use std::collections::BTreeSet;

const LENGTH: usize = 0;
const BRANCH_NUMBER: usize = 1;
const POSITIONS: usize = 2;
const LABELS: usize = 3;
const BRANCH_CLASSES: usize = 4;
const SLOT_CLASSES: usize = 5;
const BLOCK_CLASSES: usize = 6;
const LEVELS: usize = 7;

/// Sizes of the instruction equivalence classes available per entry kind
///
/// Branch classes `0..if_then` are conditional, `if_then..if_then + goto`
/// unconditional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StructureClasses {
    pub if_then: usize,
    pub goto: usize,
    pub block: usize,
    pub slot: usize,
}

impl StructureClasses {
    pub fn branch(&self) -> usize {
        self.if_then + self.goto
    }
}

#[derive(Clone)]
pub struct BranchStructureIterator {
    classes: StructureClasses,
    delay_slot: bool,
    skip_consecutive_basic_blocks: bool,
    min_length: usize,
    max_length: usize,
    min_branch_number: usize,
    max_branch_number: usize,

    lengths: RangeIterator,
    branch_numbers: RangeIterator,
    positions: SampleIterator,
    labels: ProductIterator<usize>,
    branches: ProductIterator<usize>,
    slots: ProductIterator<usize>,
    blocks: ProductIterator<usize>,
    has_value: bool,
}

impl BranchStructureIterator {
    pub fn new(config: &BranchStructureConfig, classes: StructureClasses) -> Result<Self> {
        config.validate()?;

        if classes.branch() == 0 && config.max_branch_number > 0 {
            return Err(GeneratorError::template("no branch instruction classes"));
        }
        if config.delay_slot && classes.slot == 0 && config.max_branch_number > 0 {
            return Err(GeneratorError::template("no delay slot instruction classes"));
        }

        let max_branch_number = config.max_branch_number.min(config.max_length);
        let min_length = config.min_length.max(config.min_branch_number);
        let mut max_length = config.max_length;

        if config.skip_consecutive_basic_blocks {
            let bound = 3 * max_branch_number + 1;
            if min_length > bound {
                return Err(GeneratorError::template(format!(
                    "min length {min_length} exceeds {bound}, the longest structure without consecutive basic blocks"
                )));
            }
            max_length = max_length.min(bound);
        }

        let mut iterator = Self {
            classes,
            delay_slot: config.delay_slot,
            skip_consecutive_basic_blocks: config.skip_consecutive_basic_blocks,
            min_length,
            max_length,
            min_branch_number: config.min_branch_number,
            max_branch_number,
            lengths: RangeIterator::new(min_length, max_length),
            branch_numbers: RangeIterator::new(1, 0),
            positions: SampleIterator::new(0, 0, 1),
            labels: ProductIterator::new(),
            branches: ProductIterator::new(),
            slots: ProductIterator::new(),
            blocks: ProductIterator::new(),
            has_value: false,
        };
        iterator.init();
        Ok(iterator)
    }

    /// Effective minimum length (delay slots excluded)
    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Effective maximum length (delay slots excluded)
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn classes(&self) -> StructureClasses {
        self.classes
    }

    fn length(&self) -> usize {
        self.lengths.value()
    }

    fn branch_number(&self) -> usize {
        self.branch_numbers.value()
    }

    /// Entry kinds of the current positions, delay slots included
    fn layout(&self) -> Vec<BranchEntryKind> {
        let positions: BTreeSet<usize> = self.positions.indices().iter().copied().collect();
        let mut layout = Vec::with_capacity(self.length() + self.branch_number());

        for i in 0..self.length() {
            if positions.contains(&i) {
                layout.push(BranchEntryKind::ConditionalBranch);
                if self.delay_slot {
                    layout.push(BranchEntryKind::DelaySlot);
                }
            } else {
                layout.push(BranchEntryKind::BasicBlock);
            }
        }
        layout
    }

    /// Second blocks of every adjacent basic block pair
    fn consecutive_blocks(layout: &[BranchEntryKind]) -> impl Iterator<Item = usize> + '_ {
        (1..layout.len()).filter(move |&i| {
            layout[i - 1] == BranchEntryKind::BasicBlock
                && layout[i] == BranchEntryKind::BasicBlock
        })
    }

    fn accept_positions(&self) -> bool {
        if !self.skip_consecutive_basic_blocks {
            return true;
        }
        let layout = self.layout();
        let consecutive = Self::consecutive_blocks(&layout).count();
        consecutive <= self.branch_number()
    }

    fn accept_labels(&self) -> bool {
        if !self.skip_consecutive_basic_blocks {
            return true;
        }
        let layout = self.layout();
        let targets: BTreeSet<usize> = self.labels.value().into_iter().collect();
        let labelled = Self::consecutive_blocks(&layout).all(|i| targets.contains(&i));
        labelled
    }

    fn accept(&self, level: usize) -> bool {
        match level {
            POSITIONS => self.accept_positions(),
            LABELS => self.accept_labels(),
            _ => true,
        }
    }

    fn product(count: usize, domain: usize) -> ProductIterator<usize> {
        ProductIterator::with_iterators(
            (0..count)
                .map(|_| Box::new(RangeIterator::indices(domain)) as BoxedEnumerator<usize>)
                .collect(),
        )
    }

    fn level(&mut self, level: usize) -> &mut dyn Enumerator<Item = Vec<usize>> {
        match level {
            POSITIONS => &mut self.positions,
            LABELS => &mut self.labels,
            BRANCH_CLASSES => &mut self.branches,
            SLOT_CLASSES => &mut self.slots,
            _ => &mut self.blocks,
        }
    }

    /// Rebuild `level` for the values of the levels above it
    fn reset(&mut self, level: usize) {
        match level {
            LENGTH => self.lengths.init(),
            BRANCH_NUMBER => {
                let max = self.max_branch_number.min(self.length());
                self.branch_numbers = RangeIterator::new(self.min_branch_number, max);
            }
            POSITIONS => {
                self.positions = SampleIterator::new(0, self.length() - 1, self.branch_number());
            }
            LABELS => {
                let k = self.branch_number();
                let targets = self.length() + if self.delay_slot { k } else { 0 };
                self.labels = Self::product(k, targets);
            }
            BRANCH_CLASSES => {
                self.branches = Self::product(self.branch_number(), self.classes.branch());
            }
            SLOT_CLASSES => {
                let k = if self.delay_slot { self.branch_number() } else { 0 };
                self.slots = Self::product(k, self.classes.slot);
            }
            _ => {
                let blocks = self.length() - self.branch_number();
                self.blocks = Self::product(blocks, self.classes.block);
            }
        }
    }

    fn level_has_value(&mut self, level: usize) -> bool {
        match level {
            LENGTH => self.lengths.has_value(),
            BRANCH_NUMBER => self.branch_numbers.has_value(),
            _ => self.level(level).has_value(),
        }
    }

    fn advance(&mut self, level: usize) {
        match level {
            LENGTH => self.lengths.next(),
            BRANCH_NUMBER => self.branch_numbers.next(),
            _ => self.level(level).next(),
        }
    }

    /// Skip filtered values of `level`; `false` when it runs out
    fn skip_rejected(&mut self, level: usize) -> bool {
        while self.level_has_value(level) {
            if self.accept(level) {
                return true;
            }
            trace_step!(level, "structure level value rejected");
            self.advance(level);
        }
        false
    }

    /// Move `level` (re-initialized when `fresh`, advanced otherwise) to an
    /// admissible value and re-initialize the levels below it
    fn settle(&mut self, mut level: usize, mut fresh: bool) -> bool {
        loop {
            if fresh {
                self.reset(level);
            } else {
                self.advance(level);
            }

            if self.skip_rejected(level) {
                if level + 1 == LEVELS {
                    return true;
                }
                level += 1;
                fresh = true;
            } else {
                if level == LENGTH {
                    return false;
                }
                level -= 1;
                fresh = false;
            }
        }
    }
}

impl Enumerator for BranchStructureIterator {
    type Item = BranchStructure;

    fn init(&mut self) {
        self.has_value = self.settle(LENGTH, true);
    }

    fn has_value(&self) -> bool {
        self.has_value
    }

    fn value(&self) -> BranchStructure {
        assert!(self.has_value, "value() on exhausted branch structure iterator");

        let positions: BTreeSet<usize> = self.positions.indices().iter().copied().collect();
        let labels = self.labels.value();
        let branches = self.branches.value();
        let slots = self.slots.value();
        let blocks = self.blocks.value();

        let mut entries = Vec::with_capacity(self.length() + slots.len());
        let mut branch = 0;
        let mut block = 0;

        for i in 0..self.length() {
            if positions.contains(&i) {
                let class = branches[branch];
                entries.push(BranchEntry::branch(
                    class < self.classes.if_then,
                    class,
                    labels[branch],
                ));
                if self.delay_slot {
                    entries.push(BranchEntry::delay_slot(slots[branch]));
                }
                branch += 1;
            } else {
                entries.push(BranchEntry::basic_block(blocks[block]));
                block += 1;
            }
        }

        BranchStructure::new(entries)
    }

    fn next(&mut self) {
        assert!(self.has_value, "next() on exhausted branch structure iterator");
        self.has_value = self.settle(BLOCK_CLASSES, false);
    }

    fn stop(&mut self) {
        self.has_value = false;
    }

    fn clone_box(&self) -> BoxedEnumerator<BranchStructure> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::iteration::collect_values;

    fn classes() -> StructureClasses {
        StructureClasses {
            if_then: 1,
            goto: 1,
            block: 1,
            slot: 1,
        }
    }

    #[test]
    fn test_single_branch_structures() {
        let config = BranchStructureConfig::default()
            .min_length(1)
            .max_length(1)
            .min_branch_number(1)
            .max_branch_number(1);
        let mut iterator = BranchStructureIterator::new(&config, classes()).unwrap();

        // one position, label 0, conditional or unconditional
        let structures = collect_values(&mut iterator);
        assert_eq!(structures.len(), 2);
        assert!(structures[0][0].is_conditional_branch());
        assert!(!structures[1][0].is_conditional_branch());
    }

    #[test]
    fn test_heuristic_caps_length() {
        let config = BranchStructureConfig::default()
            .min_branch_number(1)
            .max_branch_number(2)
            .max_length(20);
        let mut iterator = BranchStructureIterator::new(&config, classes()).unwrap();
        assert_eq!(iterator.max_length(), 7);

        for structure in collect_values(&mut iterator) {
            assert!(structure.length() <= 7);
            assert!(structure.branch_count() <= 2);
        }
    }

    #[test]
    fn test_labels_target_consecutive_blocks() {
        let config = BranchStructureConfig::default()
            .min_length(3)
            .max_length(3)
            .min_branch_number(1)
            .max_branch_number(1);
        let mut iterator = BranchStructureIterator::new(&config, classes()).unwrap();

        for structure in collect_values(&mut iterator) {
            let entries = structure.entries();
            for i in 1..entries.len() {
                if entries[i - 1].is_basic_block() && entries[i].is_basic_block() {
                    assert!(entries.iter().any(|e| e.is_branch() && e.label() == i));
                }
            }
        }
    }

    #[test]
    fn test_delay_slot_follows_every_branch() {
        let config = BranchStructureConfig::default()
            .delay_slot(true)
            .min_length(2)
            .max_length(3)
            .max_branch_number(1);
        let mut iterator = BranchStructureIterator::new(&config, classes()).unwrap();

        let structures = collect_values(&mut iterator);
        assert!(!structures.is_empty());
        for structure in structures {
            for (i, entry) in structure.iter().enumerate() {
                if entry.is_branch() {
                    assert!(structure[i + 1].is_delay_slot());
                    assert!(entry.label() <= structure.len() - 1);
                }
            }
        }
    }

    #[test]
    fn test_missing_branch_classes_is_an_error() {
        let classes = StructureClasses {
            block: 1,
            ..StructureClasses::default()
        };
        assert!(matches!(
            BranchStructureIterator::new(&BranchStructureConfig::default(), classes),
            Err(GeneratorError::Template(_))
        ));
    }

    #[test]
    fn test_clone_is_independent() {
        let config = BranchStructureConfig::default();
        let mut iterator = BranchStructureIterator::new(&config, classes()).unwrap();
        let snapshot = iterator.clone();

        iterator.next();
        assert_eq!(snapshot.value(), {
            let mut fresh = BranchStructureIterator::new(&config, classes()).unwrap();
            fresh.init();
            fresh.value()
        });
    }
}
