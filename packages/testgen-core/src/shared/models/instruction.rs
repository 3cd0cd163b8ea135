//! Instruction model

use super::operand::Operand;
use super::situation::Situation;
use serde::{Deserialize, Serialize};

/// Control-transfer class of an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BranchKind {
    #[default]
    None,
    Conditional,
    Unconditional,
}

/// Instruction of a test program
///
/// Label pseudo-instructions carry their text in `pseudo` and have no
/// operands.
#[derive(Debug, Clone)]
pub struct Instruction {
    pub name: String,
    pub operands: Vec<Operand>,
    pub situation: Option<Box<dyn Situation>>,
    pub branch: BranchKind,
    pub can_throw_exception: bool,
    pub nullifies_delay_slot: bool,
    pub pseudo: Option<String>,
}

impl Instruction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operands: Vec::new(),
            situation: None,
            branch: BranchKind::None,
            can_throw_exception: false,
            nullifies_delay_slot: false,
            pseudo: None,
        }
    }

    /// Label pseudo-instruction (`text` is emitted verbatim, e.g. `"L3:"`)
    pub fn label(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            pseudo: Some(text.clone()),
            ..Self::new(text)
        }
    }

    /// Builder: append an operand
    pub fn with_operand(mut self, operand: Operand) -> Self {
        self.operands.push(operand);
        self
    }

    /// Builder: attach a situation
    pub fn with_situation(mut self, situation: Box<dyn Situation>) -> Self {
        self.situation = Some(situation);
        self
    }

    /// Builder: mark as conditional branch
    pub fn conditional_branch(mut self) -> Self {
        self.branch = BranchKind::Conditional;
        self
    }

    /// Builder: mark as unconditional branch
    pub fn unconditional_branch(mut self) -> Self {
        self.branch = BranchKind::Unconditional;
        self
    }

    /// Builder: set whether the instruction can raise an exception
    pub fn throwing(mut self, can_throw: bool) -> Self {
        self.can_throw_exception = can_throw;
        self
    }

    /// Builder: branch annuls its delay slot when not taken
    pub fn nullifying_delay_slot(mut self) -> Self {
        self.nullifies_delay_slot = true;
        self
    }

    pub fn is_branch(&self) -> bool {
        self.branch != BranchKind::None
    }

    pub fn is_conditional_branch(&self) -> bool {
        self.branch == BranchKind::Conditional
    }

    pub fn can_throw_exception(&self) -> bool {
        self.can_throw_exception
    }

    pub fn nullifies_delay_slot(&self) -> bool {
        self.nullifies_delay_slot
    }

    pub fn is_pseudo(&self) -> bool {
        self.pseudo.is_some()
    }

    pub fn operand(&self, index: usize) -> Option<&Operand> {
        self.operands.get(index)
    }

    pub fn operand_mut(&mut self, index: usize) -> Option<&mut Operand> {
        self.operands.get_mut(index)
    }

    pub fn count_operand(&self) -> usize {
        self.operands.len()
    }

    pub fn situation(&self) -> Option<&dyn Situation> {
        self.situation.as_deref()
    }

    pub fn situation_mut(&mut self) -> Option<&mut (dyn Situation + 'static)> {
        self.situation.as_deref_mut()
    }
}
