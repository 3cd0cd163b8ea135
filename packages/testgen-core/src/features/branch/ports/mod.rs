//! Branch trace situation seam
//!
//! A branch trace situation drives the condition of one branch instruction
//! so that it follows its trace. It is configured from the branch structure
//! (number, index, label, trace, coverage), then asked for step programs
//! that go into the covered blocks or into the delay slot, and for a prepare
//! program that sets the initial condition.
//!
//! Instructions only carry plain situations. A branch trace situation is
//! attached through `attach` and found again with `BranchTraceLookup`.

use crate::features::branch::domain::{BranchSegment, BranchTrace};
use crate::shared::models::{GeneratorContext, Processor, Program, Situation};
use std::any::Any;
use std::fmt;

pub trait BranchTraceSituation: fmt::Debug {
    fn state(&self) -> &BranchTraceState;

    fn state_mut(&mut self) -> &mut BranchTraceState;

    /// Prepare the step sequence for the configured trace
    fn init(&mut self, processor: &dyn Processor, context: &mut GeneratorContext);

    /// Next step program; `None` when the trace cannot be realized
    fn step(&mut self) -> Option<Program>;

    /// Program establishing the initial condition
    fn prepare(&mut self, processor: &dyn Processor, context: &mut GeneratorContext) -> Program;

    fn satisfy_condition(&mut self);

    fn violate_condition(&mut self);

    fn set_condition(&mut self, condition: bool) {
        if condition {
            self.satisfy_condition();
        } else {
            self.violate_condition();
        }
    }

    fn clone_branch_box(&self) -> Box<dyn BranchTraceSituation>;

    /// Variant enumeration of the underlying situation
    fn situation(&self) -> &dyn Situation;

    fn situation_mut(&mut self) -> &mut dyn Situation;

    fn set_branch_number(&mut self, number: usize) {
        self.state_mut().branch_number = number;
    }

    fn set_branch_index(&mut self, index: usize) {
        self.state_mut().branch_index = index;
    }

    fn set_branch_label(&mut self, label: usize) {
        self.state_mut().branch_label = label;
    }

    fn set_branch_trace(&mut self, trace: BranchTrace) {
        self.state_mut().branch_trace = trace;
    }

    fn set_block_coverage(&mut self, coverage: Option<BranchSegment>) {
        self.state_mut().block_coverage = coverage;
    }

    fn set_slot_coverage(&mut self, coverage: Option<BranchSegment>) {
        self.state_mut().slot_coverage = coverage;
    }

    fn can_insert_step_into_block(&self) -> bool {
        self.state().block_coverage.is_some()
    }

    fn can_insert_step_into_slot(&self) -> bool {
        self.state().slot_coverage.is_some()
    }
}

impl Clone for Box<dyn BranchTraceSituation> {
    fn clone(&self) -> Self {
        self.clone_branch_box()
    }
}

/// Branch trace situation carried by an instruction
#[derive(Debug, Clone)]
struct AttachedBranchSituation(Box<dyn BranchTraceSituation>);

impl Situation for AttachedBranchSituation {
    fn name(&self) -> &str {
        self.0.situation().name()
    }

    fn init(&mut self) {
        self.0.situation_mut().init();
    }

    fn has_value(&self) -> bool {
        self.0.situation().has_value()
    }

    fn next(&mut self) {
        self.0.situation_mut().next();
    }

    fn stop(&mut self) {
        self.0.situation_mut().stop();
    }

    fn clone_box(&self) -> Box<dyn Situation> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Wrap a configured branch trace situation for an instruction
pub fn attach(situation: Box<dyn BranchTraceSituation>) -> Box<dyn Situation> {
    Box::new(AttachedBranchSituation(situation))
}

/// Branch trace situation behind an instruction's situation, if any
pub trait BranchTraceLookup {
    fn as_branch_trace(&self) -> Option<&dyn BranchTraceSituation>;

    fn as_branch_trace_mut(&mut self) -> Option<&mut (dyn BranchTraceSituation + 'static)>;
}

impl<'a> BranchTraceLookup for dyn Situation + 'a {
    fn as_branch_trace(&self) -> Option<&dyn BranchTraceSituation> {
        self.as_any()
            .downcast_ref::<AttachedBranchSituation>()
            .map(|attached| attached.0.as_ref())
    }

    fn as_branch_trace_mut(&mut self) -> Option<&mut (dyn BranchTraceSituation + 'static)> {
        self.as_any_mut()
            .downcast_mut::<AttachedBranchSituation>()
            .map(|attached| attached.0.as_mut())
    }
}

/// Configuration shared by every branch trace situation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchTraceState {
    pub branch_number: usize,
    pub branch_index: usize,
    pub branch_label: usize,
    pub branch_trace: BranchTrace,
    pub block_coverage: Option<BranchSegment>,
    pub slot_coverage: Option<BranchSegment>,
}

impl BranchTraceState {
    pub fn is_forward_branch(&self) -> bool {
        self.branch_index < self.branch_label
    }

    pub fn is_backward_branch(&self) -> bool {
        !self.is_forward_branch()
    }
}

impl fmt::Display for BranchTraceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Target: {}, Trace: {}", self.branch_label, self.branch_trace)?;
        if let Some(blocks) = &self.block_coverage {
            write!(f, ", Blocks: {blocks:?}")?;
        }
        if let Some(slots) = &self.slot_coverage {
            write!(f, ", Slots: {slots:?}")?;
        }
        Ok(())
    }
}
