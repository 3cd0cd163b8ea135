//! Shared models

mod instruction;
mod operand;
mod processor;
mod program;
mod situation;

pub use instruction::{BranchKind, Instruction};
pub use operand::{Operand, OperandId, OperandKind};
pub use processor::{GeneratorContext, NamedProcessor, Processor};
pub use program::Program;
pub use situation::{Situation, VariantSituation};
