//! Instruction equivalence classes
//!
//! Structural enumerators choose a *class* per template position and an
//! instruction from that class when the template is materialized.
//! Class indices are stable in registration order.

use crate::shared::models::Instruction;
use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashMap;

/// Named group of interchangeable instructions
#[derive(Debug, Clone, Default)]
pub struct EquivalenceClass {
    name: String,
    instructions: Vec<Instruction>,
}

impl EquivalenceClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Random member
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Instruction> {
        self.instructions.choose(rng)
    }
}

/// Instructions partitioned into equivalence classes
#[derive(Debug, Clone, Default)]
pub struct InstructionClasses {
    classes: Vec<EquivalenceClass>,
    index: FxHashMap<String, usize>,
}

impl InstructionClasses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `instruction` to `class`, creating the class on first use
    ///
    /// Returns the class index.
    pub fn register(&mut self, class: &str, instruction: Instruction) -> usize {
        let index = self.register_class(class);
        self.classes[index].instructions.push(instruction);
        index
    }

    /// Make sure `class` exists, possibly empty
    pub fn register_class(&mut self, class: &str) -> usize {
        if let Some(&index) = self.index.get(class) {
            return index;
        }
        let index = self.classes.len();
        self.classes.push(EquivalenceClass::new(class));
        self.index.insert(class.to_string(), index);
        index
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn class(&self, index: usize) -> &EquivalenceClass {
        &self.classes[index]
    }

    pub fn class_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EquivalenceClass> {
        self.classes.iter()
    }

    /// Total number of instructions over all classes
    pub fn instruction_count(&self) -> usize {
        self.classes.iter().map(EquivalenceClass::len).sum()
    }
}
