//! Instruction and branch fixtures

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;
use testgen_core::features::branch::{
    BranchEntry, BranchStructure, BranchTraceSituation, CounterBranchSituation,
};
use testgen_core::shared::models::{NamedProcessor, VariantSituation};
use testgen_core::{GeneratorContext, Instruction, Operand, Processor};

pub fn processor() -> Rc<dyn Processor> {
    Rc::new(NamedProcessor::new("mips"))
}

pub fn context() -> Rc<RefCell<GeneratorContext>> {
    Rc::new(RefCell::new(GeneratorContext::default()))
}

/// `name rd` writing general purpose register `register`
pub fn writer(name: &str, register: u64) -> Instruction {
    Instruction::new(name)
        .with_operand(Operand::register_def("rd", "GPR").with_value(register))
        .with_situation(Box::new(VariantSituation::new("default", 1)))
}

/// `name rs` reading general purpose register `register`
pub fn reader(name: &str, register: u64) -> Instruction {
    Instruction::new(name)
        .with_operand(Operand::register_use("rs", "GPR").with_value(register))
        .with_situation(Box::new(VariantSituation::new("default", 1)))
}

/// Small ISA: one conditional and one unconditional branch class, an ALU
/// class and a memory class whose member may throw
pub fn branch_isa() -> Vec<(String, Instruction)> {
    vec![
        ("beq".to_string(), Instruction::new("beq").conditional_branch()),
        ("bne".to_string(), Instruction::new("bne").conditional_branch()),
        ("j".to_string(), Instruction::new("j").unconditional_branch()),
        ("alu".to_string(), Instruction::new("add")),
        ("alu".to_string(), Instruction::new("sub")),
        ("mem".to_string(), Instruction::new("lw").throwing(true)),
    ]
}

pub fn branch_situations() -> FxHashMap<String, Box<dyn BranchTraceSituation>> {
    ["beq", "bne", "j"]
        .into_iter()
        .map(|name| {
            (
                name.to_string(),
                Box::new(CounterBranchSituation::new(name)) as Box<dyn BranchTraceSituation>,
            )
        })
        .collect()
}

/// `0: block, 1: if goto 0, 2: if goto 4, 3: block, 4: block`
pub fn loop_then_skip() -> BranchStructure {
    BranchStructure::new(vec![
        BranchEntry::basic_block(0),
        BranchEntry::branch(true, 0, 0),
        BranchEntry::branch(true, 0, 4),
        BranchEntry::basic_block(0),
        BranchEntry::basic_block(0),
    ])
}
