//! Dependency iterator
//!
//! Enumerates the consistent assignments of one dependency type over a
//! program.
//!
//! # Algorithm
//! 1. `process` creates one instance per applicable operand pair of every
//!    ordered instruction pair (determinant before dependent) where both
//!    instructions carry a situation.
//! 2. The instances form an odometer: `step` scans them last-to-first,
//!    advances the first one whose precondition holds and which still has a
//!    value, and resets every exhausted instance it passes.
//! 3. `init`/`next` keep stepping until the conjunction of per-operand
//!    consistency checks holds (generate-and-test).
//!
//! # Time Complexity
//! O(product of instance cursor sizes × consistency cost) in the worst case.

use crate::features::dependency::domain::{
    ConsistencyView, DependencyIndex, DependencyLink, OperandLayout,
};
use crate::features::dependency::ports::{Dependency, DependencyType};
use crate::features::iteration::{BoxedEnumerator, Enumerator};
use crate::shared::models::{OperandId, Program};
use std::ops::RangeInclusive;

/// Odometer over the instances of one dependency type
#[derive(Debug, Clone)]
pub struct DependencyIterator {
    dependency_type: Box<dyn DependencyType>,
    layout: OperandLayout,
    instances: Vec<Box<dyn Dependency>>,
    index: DependencyIndex,
    has_value: bool,
}

impl DependencyIterator {
    pub fn new(dependency_type: Box<dyn DependencyType>) -> Self {
        Self {
            dependency_type,
            layout: OperandLayout::default(),
            instances: Vec::new(),
            index: DependencyIndex::default(),
            has_value: false,
        }
    }

    pub fn dependency_type(&self) -> &dyn DependencyType {
        self.dependency_type.as_ref()
    }

    pub fn is_register_dependency(&self) -> bool {
        self.dependency_type.is_register()
    }

    /// Create instances over every instruction pair of `program`
    pub fn process(&mut self, program: &Program) {
        let last = program.len().saturating_sub(1);
        self.collect(program, 0..=last, 0..=last);
    }

    /// Create instances with determinants in `[start1, end1]` and dependents
    /// in `[start2, end2]`
    pub fn process_range(
        &mut self,
        program: &Program,
        start1: usize,
        end1: usize,
        start2: usize,
        end2: usize,
    ) {
        self.collect(program, start1..=end1, start2..=end2);
    }

    fn collect(
        &mut self,
        program: &Program,
        determinants: RangeInclusive<usize>,
        dependents: RangeInclusive<usize>,
    ) {
        self.layout = OperandLayout::from_program(program);
        self.instances.clear();
        self.has_value = false;

        for j in dependents {
            let Some(dependent) = program.get(j) else {
                break;
            };
            if dependent.situation.is_none() {
                continue;
            }
            for i in determinants.clone() {
                if i >= j {
                    break;
                }
                let Some(determinant) = program.get(i) else {
                    break;
                };
                if determinant.situation.is_none() {
                    continue;
                }
                for (b, dependent_operand) in dependent.operands.iter().enumerate() {
                    for (a, determinant_operand) in determinant.operands.iter().enumerate() {
                        if self
                            .dependency_type
                            .is_applicable_to(dependent_operand, determinant_operand)
                        {
                            self.instances.push(self.dependency_type.create_dependency(
                                OperandId::new(j, b),
                                OperandId::new(i, a),
                            ));
                        }
                    }
                }
            }
        }

        self.index = DependencyIndex::build(&self.instances);
        tracing::debug!(
            kind = self.dependency_type.name(),
            instances = self.instances.len(),
            "dependency instances created"
        );
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn instances(&self) -> &[Box<dyn Dependency>] {
        &self.instances
    }

    /// Conjunction of per-operand consistency over every operand
    pub fn is_consistent(&self) -> bool {
        let view = ConsistencyView::new(&self.layout, &self.instances, &self.index);
        self.layout.operand_ids().all(|operand| {
            self.index
                .forward(operand)
                .iter()
                .chain(self.index.backward(operand))
                .all(|&k| self.instances[k].is_consistent(operand, &view))
        })
    }

    fn step(&mut self) {
        for instance in self.instances.iter_mut().rev() {
            if instance.precondition() && instance.has_value() {
                instance.next();
                if instance.has_value() {
                    return;
                }
            }
            instance.init();
        }
        self.has_value = false;
    }

    /// Realize the active instances on `program`, in dependent order
    pub fn apply(&self, program: &mut Program) {
        for instance in self.instances.iter().filter(|d| d.is_active()) {
            instance.apply(program);
        }
    }
}

impl Enumerator for DependencyIterator {
    type Item = Vec<DependencyLink>;

    fn init(&mut self) {
        for instance in &mut self.instances {
            instance.init();
        }
        self.has_value = true;
        while self.has_value && !self.is_consistent() {
            self.step();
        }
    }

    fn has_value(&self) -> bool {
        self.has_value
    }

    fn value(&self) -> Vec<DependencyLink> {
        assert!(self.has_value, "value() on exhausted dependency iterator");
        self.instances
            .iter()
            .filter(|d| d.is_active())
            .map(|d| DependencyLink::of(d.as_ref()))
            .collect()
    }

    fn next(&mut self) {
        assert!(self.has_value, "next() on exhausted dependency iterator");
        loop {
            self.step();
            trace_step!(kind = self.dependency_type.name(), "dependency step");
            if !self.has_value || self.is_consistent() {
                break;
            }
        }
    }

    fn stop(&mut self) {
        self.has_value = false;
    }

    fn clone_box(&self) -> BoxedEnumerator<Vec<DependencyLink>> {
        Box::new(self.clone())
    }
}
