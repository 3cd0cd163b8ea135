//! Operand layout and consistency view
//!
//! Dependency iterators capture the operand metadata of the program they
//! processed (`OperandLayout`) and index their instances by operand
//! (`DependencyIndex`). Consistency checks only read through
//! [`ConsistencyView`], so instances never alias the program or each other.

use crate::features::dependency::ports::Dependency;
use crate::shared::models::{Operand, OperandId, Program};
use rustc_hash::FxHashMap;

/// Operands of a processed program, by instruction
#[derive(Debug, Clone, Default)]
pub struct OperandLayout {
    instructions: Vec<Vec<Operand>>,
}

impl OperandLayout {
    pub fn from_program(program: &Program) -> Self {
        Self {
            instructions: program.iter().map(|i| i.operands.clone()).collect(),
        }
    }

    pub fn operand(&self, id: OperandId) -> Option<&Operand> {
        self.instructions.get(id.instruction)?.get(id.operand)
    }

    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    /// Every operand address, in program order
    pub fn operand_ids(&self) -> impl Iterator<Item = OperandId> + '_ {
        self.instructions
            .iter()
            .enumerate()
            .flat_map(|(i, operands)| (0..operands.len()).map(move |j| OperandId::new(i, j)))
    }
}

/// Instance indices by dependent (forward) and determinant (backward) operand
#[derive(Debug, Clone, Default)]
pub struct DependencyIndex {
    forward: FxHashMap<OperandId, Vec<usize>>,
    backward: FxHashMap<OperandId, Vec<usize>>,
}

impl DependencyIndex {
    pub fn build(instances: &[Box<dyn Dependency>]) -> Self {
        let mut index = Self::default();
        for (k, instance) in instances.iter().enumerate() {
            index
                .forward
                .entry(instance.dependent())
                .or_default()
                .push(k);
            index
                .backward
                .entry(instance.determinant())
                .or_default()
                .push(k);
        }
        index
    }

    pub fn forward(&self, operand: OperandId) -> &[usize] {
        self.forward.get(&operand).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn backward(&self, operand: OperandId) -> &[usize] {
        self.backward.get(&operand).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Read-only view handed to `Dependency::is_consistent`
pub struct ConsistencyView<'a> {
    layout: &'a OperandLayout,
    instances: &'a [Box<dyn Dependency>],
    index: &'a DependencyIndex,
}

impl<'a> ConsistencyView<'a> {
    pub fn new(
        layout: &'a OperandLayout,
        instances: &'a [Box<dyn Dependency>],
        index: &'a DependencyIndex,
    ) -> Self {
        Self {
            layout,
            instances,
            index,
        }
    }

    pub fn operand(&self, id: OperandId) -> Option<&'a Operand> {
        self.layout.operand(id)
    }

    /// Instances whose dependent operand is `operand`
    pub fn forward(&self, operand: OperandId) -> impl Iterator<Item = &'a dyn Dependency> + 'a {
        let instances = self.instances;
        let index: &'a DependencyIndex = self.index;
        index
            .forward(operand)
            .iter()
            .map(move |&k| instances[k].as_ref())
    }

    /// Instances whose determinant operand is `operand`
    pub fn backward(&self, operand: OperandId) -> impl Iterator<Item = &'a dyn Dependency> + 'a {
        let instances = self.instances;
        let index: &'a DependencyIndex = self.index;
        index
            .backward(operand)
            .iter()
            .map(move |&k| instances[k].as_ref())
    }
}
