//! Program (instruction sequence) model

use super::instruction::Instruction;
use super::operand::{Operand, OperandId};
use std::fmt;

/// Ordered instruction sequence
#[derive(Debug, Clone, Default)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenate programs in order
    pub fn concat<'a>(programs: impl IntoIterator<Item = &'a Program>) -> Self {
        let mut result = Program::new();
        for program in programs {
            result.extend(program.clone());
        }
        result
    }

    pub fn append(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn extend(&mut self, program: Program) {
        self.instructions.extend(program.instructions);
    }

    pub fn insert(&mut self, index: usize, instruction: Instruction) {
        self.instructions.insert(index, instruction);
    }

    /// Insert a whole program before position `index`
    pub fn insert_program(&mut self, index: usize, program: Program) {
        self.instructions.splice(index..index, program.instructions);
    }

    pub fn remove(&mut self, index: usize) -> Instruction {
        self.instructions.remove(index)
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

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Instruction> {
        self.instructions.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Instruction> {
        self.instructions.iter_mut()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn operand(&self, id: OperandId) -> Option<&Operand> {
        self.instructions.get(id.instruction)?.operand(id.operand)
    }

    pub fn operand_mut(&mut self, id: OperandId) -> Option<&mut Operand> {
        self.instructions
            .get_mut(id.instruction)?
            .operand_mut(id.operand)
    }

    /// Instruction names in order (pseudo-instructions included)
    pub fn names(&self) -> Vec<&str> {
        self.instructions.iter().map(|i| i.name.as_str()).collect()
    }
}

impl From<Vec<Instruction>> for Program {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Self {
            instructions: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Program {
    type Item = Instruction;
    type IntoIter = std::vec::IntoIter<Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.into_iter()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.instructions {
            if instruction.is_pseudo() {
                writeln!(f, "{}", instruction.name)?;
                continue;
            }
            write!(f, "    {}", instruction.name)?;
            for (i, operand) in instruction.operands.iter().enumerate() {
                let sep = if i == 0 { " " } else { ", " };
                match operand.value {
                    Some(value) => write!(f, "{sep}{}={value}", operand.name)?,
                    None => write!(f, "{sep}{}", operand.name)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
