//! Coverage construction for a traced structure
//!
//! # Algorithm
//! 1. Replay the traces and record, per branch execution, the blocks and
//!    delay slots executed until the next occurrence of the same branch.
//! 2. Per branch, keep the segments that end with an outcome change. Each
//!    of them must contain a step of the branch's situation, so the
//!    coverage is a hitting set of those segments, built greedily (most
//!    segments hit first, random tie-breaks).
//! 3. A change segment without blocks can only be covered by the branch's
//!    own delay slot, which executes on every occurrence.
//! 4. Replay again and record, per execution, how many covered steps ran
//!    since the previous occurrence.
//!
//! The cover is greedy, not minimal.

use super::walker::{walk, WalkStep};
use crate::config::BranchTraceConfig;
use crate::features::branch::domain::{BranchSegment, BranchStructure};
use rand::Rng;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// Builds block and delay slot coverage for every branch of a structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchTraceConstructor {
    use_delay_slots: bool,
}

impl Default for BranchTraceConstructor {
    fn default() -> Self {
        Self::new()
    }
}

impl BranchTraceConstructor {
    pub fn new() -> Self {
        Self {
            use_delay_slots: true,
        }
    }

    /// Constructor that never falls back to delay slot coverage
    pub fn without_delay_slots() -> Self {
        Self {
            use_delay_slots: false,
        }
    }

    pub fn from_config(config: &BranchTraceConfig) -> Self {
        Self {
            use_delay_slots: config.use_delay_slots,
        }
    }

    pub fn uses_delay_slots(&self) -> bool {
        self.use_delay_slots
    }

    /// Compute coverage and coverage counts in place
    ///
    /// Returns `false` when some outcome change cannot be covered; the
    /// structure is left with partial coverage in that case.
    pub fn construct<R: Rng + ?Sized>(
        &self,
        structure: &mut BranchStructure,
        rng: &mut R,
    ) -> bool {
        let mut steps = Vec::new();
        walk(structure, |step| steps.push(step));

        Self::construct_segments(structure, &steps);

        for index in 0..structure.len() {
            if !structure[index].is_branch() {
                continue;
            }
            if !self.construct_coverage(structure, index, rng) {
                tracing::debug!(branch = index, "no coverage for outcome change");
                return false;
            }
        }

        Self::construct_coverage_counts(structure, &steps);
        true
    }

    fn construct_segments(structure: &mut BranchStructure, steps: &[WalkStep]) {
        for entry in structure.iter_mut() {
            entry.set_block_coverage(None);
            entry.set_slot_coverage(None);
            for execution in entry.trace_mut().iter_mut() {
                execution.clear();
            }
        }

        // branch index -> execution currently collecting its segment
        let mut current: FxHashMap<usize, usize> = FxHashMap::default();

        for &step in steps {
            match step {
                WalkStep::Branch { index, execution } => {
                    current.insert(index, execution);
                }
                WalkStep::BasicBlock { index: block } => {
                    for (&branch, &execution) in &current {
                        if let Some(e) = structure
                            .get_mut(branch)
                            .and_then(|entry| entry.trace_mut().get_mut(execution))
                        {
                            e.add_block(block);
                        }
                    }
                }
                WalkStep::DelaySlot { index: slot } => {
                    for (&branch, &execution) in &current {
                        if let Some(e) = structure
                            .get_mut(branch)
                            .and_then(|entry| entry.trace_mut().get_mut(execution))
                        {
                            e.add_slot(slot);
                        }
                    }
                }
            }
        }
    }

    fn construct_coverage<R: Rng + ?Sized>(
        &self,
        structure: &mut BranchStructure,
        index: usize,
        rng: &mut R,
    ) -> bool {
        let trace = structure[index].trace();

        let segments: Vec<BranchSegment> = trace
            .iter()
            .zip(trace.iter().skip(1))
            .filter(|(pre, post)| pre.condition() != post.condition())
            .map(|(pre, _)| pre.block_segment().clone())
            .collect();

        // Fictitious branch: the outcome never changes
        if segments.is_empty() {
            structure[index].set_block_coverage(Some(BranchSegment::new()));
            return true;
        }

        if segments.iter().any(BranchSegment::is_empty) {
            if !self.use_delay_slots {
                return false;
            }

            let mut slots = trace.iter().map(|e| e.slot_segment().clone());
            let first = slots.next().unwrap_or_default();
            let common = slots.fold(first, |acc, s| acc.intersection(&s).copied().collect());

            // Only the branch's own slot can host its step
            if !common.contains(&(index + 1)) {
                return false;
            }
            structure[index].set_slot_coverage(Some(common));
            return true;
        }

        let coverage = if segments.len() == 1 {
            let mut coverage = BranchSegment::new();
            coverage.extend(choose(&segments[0], rng));
            coverage
        } else {
            greedy_cover(segments, rng)
        };

        structure[index].set_block_coverage(Some(coverage));
        true
    }

    fn construct_coverage_counts(structure: &mut BranchStructure, steps: &[WalkStep]) {
        let size = structure.len();
        let mut counters = vec![(0usize, 0usize); size];
        let mut counts: Vec<(usize, usize, usize, usize)> = Vec::new();

        for &step in steps {
            match step {
                WalkStep::Branch { index, execution } => {
                    let (blocks, slots) = counters[index];
                    counts.push((index, execution, blocks, slots));
                    counters[index] = (0, 0);
                }
                WalkStep::BasicBlock { index: block } => {
                    for (branch, counter) in counters.iter_mut().enumerate() {
                        if structure[branch]
                            .block_coverage()
                            .is_some_and(|c| c.contains(&block))
                        {
                            counter.0 += 1;
                        }
                    }
                }
                WalkStep::DelaySlot { index: slot } => {
                    if slot == 0 {
                        continue;
                    }
                    let branch = slot - 1;
                    if structure[branch]
                        .slot_coverage()
                        .is_some_and(|c| c.contains(&slot))
                    {
                        counters[branch].1 += 1;
                    }
                }
            }
        }

        for (index, execution, blocks, slots) in counts {
            if let Some(e) = structure
                .get_mut(index)
                .and_then(|entry| entry.trace_mut().get_mut(execution))
            {
                e.set_coverage_counts(blocks, slots);
            }
        }
    }
}

/// Uniformly random element of a non-empty set
fn choose<R: Rng + ?Sized>(set: &BranchSegment, rng: &mut R) -> Option<usize> {
    if set.is_empty() {
        return None;
    }
    set.iter().nth(rng.gen_range(0..set.len())).copied()
}

/// Greedy hitting set over non-empty segments
fn greedy_cover<R: Rng + ?Sized>(
    mut uncovered: Vec<BranchSegment>,
    rng: &mut R,
) -> BranchSegment {
    let mut coverage = BranchSegment::new();

    while !uncovered.is_empty() {
        let mut hits: BTreeMap<usize, usize> = BTreeMap::new();
        for segment in &uncovered {
            for &block in segment {
                *hits.entry(block).or_default() += 1;
            }
        }

        let Some(&max) = hits.values().max() else {
            break;
        };
        let best: BranchSegment = hits
            .iter()
            .filter(|(_, count)| **count == max)
            .map(|(&block, _)| block)
            .collect();

        let Some(block) = choose(&best, rng) else {
            break;
        };
        coverage.insert(block);
        uncovered.retain(|segment| !segment.contains(&block));
    }

    coverage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::branch::domain::{BranchEntry, BranchExecution};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn segment(blocks: &[usize]) -> BranchSegment {
        blocks.iter().copied().collect()
    }

    /// 0: block, 1: if goto 0, 2: block
    fn backward_loop(conditions: &[bool]) -> BranchStructure {
        let mut structure = BranchStructure::new(vec![
            BranchEntry::basic_block(0),
            BranchEntry::branch(true, 0, 0),
            BranchEntry::basic_block(0),
        ]);
        for &condition in conditions {
            structure
                .get_mut(1)
                .unwrap()
                .trace_mut()
                .push(BranchExecution::with_condition(true, condition));
        }
        structure
    }

    #[test]
    fn test_fictitious_branch_gets_empty_coverage() {
        let mut structure = backward_loop(&[false]);
        let mut rng = StdRng::seed_from_u64(1);

        assert!(BranchTraceConstructor::new().construct(&mut structure, &mut rng));
        assert_eq!(structure[1].block_coverage(), Some(&BranchSegment::new()));
        assert_eq!(structure[1].slot_coverage(), None);
    }

    #[test]
    fn test_single_change_segment_picks_one_block() {
        // T then F: the loop body (block 0) runs between the occurrences
        let mut structure = backward_loop(&[true, false]);
        let mut rng = StdRng::seed_from_u64(1);

        assert!(BranchTraceConstructor::new().construct(&mut structure, &mut rng));
        assert_eq!(structure[1].block_coverage(), Some(&segment(&[0])));

        let trace = structure[1].trace();
        assert_eq!(trace.get(0).unwrap().block_segment(), &segment(&[0]));
        assert_eq!(trace.get(1).unwrap().block_segment(), &segment(&[2]));
        // block 0 ran once before the first occurrence and once before the second
        assert_eq!(trace.get(0).unwrap().block_coverage_count(), 1);
        assert_eq!(trace.get(1).unwrap().block_coverage_count(), 1);
    }

    #[test]
    fn test_empty_change_segment_needs_delay_slot() {
        // 0: if goto 0, 1: block - the taken path executes nothing in between
        let build = || {
            let mut structure = BranchStructure::new(vec![
                BranchEntry::branch(true, 0, 0),
                BranchEntry::basic_block(0),
            ]);
            let trace = structure.get_mut(0).unwrap().trace_mut();
            trace.push(BranchExecution::with_condition(true, true));
            trace.push(BranchExecution::with_condition(true, false));
            structure
        };
        let mut rng = StdRng::seed_from_u64(3);

        let mut structure = build();
        assert!(!BranchTraceConstructor::new().construct(&mut structure, &mut rng));
        let mut structure = build();
        assert!(!BranchTraceConstructor::without_delay_slots().construct(&mut structure, &mut rng));
    }

    #[test]
    fn test_delay_slot_covers_empty_segment() {
        // 0: if goto 0, 1: slot, 2: block
        let mut structure = BranchStructure::new(vec![
            BranchEntry::branch(true, 0, 0),
            BranchEntry::delay_slot(0),
            BranchEntry::basic_block(0),
        ]);
        let trace = structure.get_mut(0).unwrap().trace_mut();
        trace.push(BranchExecution::with_condition(true, true));
        trace.push(BranchExecution::with_condition(true, false));
        let mut rng = StdRng::seed_from_u64(3);

        assert!(BranchTraceConstructor::new().construct(&mut structure, &mut rng));
        assert_eq!(structure[0].slot_coverage(), Some(&segment(&[1])));
        assert_eq!(structure[0].block_coverage(), None);
        // own slot ran once between the occurrences
        assert_eq!(
            structure[0].trace().get(1).unwrap().slot_coverage_count(),
            1
        );

        let mut structure_without = structure.clone();
        assert!(!BranchTraceConstructor::without_delay_slots()
            .construct(&mut structure_without, &mut rng));
    }

    #[test]
    fn test_greedy_cover_hits_every_segment() {
        let mut rng = StdRng::seed_from_u64(11);
        let segments = vec![segment(&[1, 2]), segment(&[2, 3]), segment(&[4])];

        let cover = greedy_cover(segments.clone(), &mut rng);
        assert_eq!(cover, segment(&[2, 4]));
        for s in &segments {
            assert!(s.iter().any(|b| cover.contains(b)));
        }
    }

    #[test]
    fn test_greedy_cover_ties_stay_inside_maxima() {
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let cover = greedy_cover(vec![segment(&[5, 6]), segment(&[5, 6])], &mut rng);
            assert_eq!(cover.len(), 1);
            assert!(cover.is_subset(&segment(&[5, 6])));
        }
    }
}
