//! Operand model
//!
//! Operands are plain value records owned by their instruction. Dependencies
//! never hold references to operands; they address them by [`OperandId`]
//! (instruction position, operand position) inside the program being
//! enumerated.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Arena-style operand address: `instruction`-th instruction, `operand`-th operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperandId {
    pub instruction: usize,
    pub operand: usize,
}

impl OperandId {
    pub fn new(instruction: usize, operand: usize) -> Self {
        Self {
            instruction,
            operand,
        }
    }
}

impl fmt::Display for OperandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.instruction, self.operand)
    }
}

/// Operand kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperandKind {
    Register,
    Immediate,
    Address,
}

/// Operand of an instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operand {
    pub name: String,
    pub kind: OperandKind,
    /// Content type name (e.g. "GPR", "FPR"); registers of different content
    /// types never depend on each other
    pub content_type: String,
    /// Operand is read by the instruction
    pub input: bool,
    /// Operand is written by the instruction
    pub output: bool,
    /// Register number or immediate value, once assigned
    pub value: Option<u64>,
}

impl Operand {
    /// Register operand read by the instruction
    pub fn register_use(name: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: OperandKind::Register,
            content_type: content_type.into(),
            input: true,
            output: false,
            value: None,
        }
    }

    /// Register operand written by the instruction
    pub fn register_def(name: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: OperandKind::Register,
            content_type: content_type.into(),
            input: false,
            output: true,
            value: None,
        }
    }

    /// Immediate operand
    pub fn immediate(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: OperandKind::Immediate,
            content_type: String::new(),
            input: true,
            output: false,
            value: None,
        }
    }

    /// Builder: set the assigned value
    pub fn with_value(mut self, value: u64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn is_register(&self) -> bool {
        self.kind == OperandKind::Register
    }

    pub fn is_input(&self) -> bool {
        self.input
    }

    pub fn is_output(&self) -> bool {
        self.output
    }

    /// Content types are compatible when a value written as `self` can be
    /// read back as `other`
    pub fn is_content_compatible(&self, other: &Operand) -> bool {
        self.content_type == other.content_type
    }
}
