//! Counter-driven branch trace situation
//!
//! Reference situation for branches whose condition is a loop counter: the
//! prepare program loads the counter with the outcome sequence and every
//! step shifts it by one outcome. Steps are plain instructions named after
//! the situation (`<name>.step`), prepare is `<name>.prepare`.

use crate::features::branch::ports::{BranchTraceSituation, BranchTraceState};
use crate::shared::models::{GeneratorContext, Instruction, Processor, Program, Situation};
use std::any::Any;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterBranchSituation {
    name: String,
    state: BranchTraceState,
    condition: bool,
    /// Step programs handed out since `init`
    steps: usize,
    has_value: bool,
}

impl CounterBranchSituation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: BranchTraceState::default(),
            condition: false,
            steps: 0,
            has_value: true,
        }
    }

    /// Condition the prepare program establishes
    pub fn condition(&self) -> bool {
        self.condition
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Outcome sequence packed into an integer, first outcome in bit 0
    fn encoded_trace(&self) -> u64 {
        self.state
            .branch_trace
            .iter()
            .take(64)
            .enumerate()
            .filter(|(_, e)| e.condition())
            .fold(0, |acc, (i, _)| acc | (1 << i))
    }
}

impl Situation for CounterBranchSituation {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self) {
        self.has_value = true;
    }

    fn has_value(&self) -> bool {
        self.has_value
    }

    fn next(&mut self) {
        assert!(self.has_value, "next() on exhausted situation '{}'", self.name);
        self.has_value = false;
    }

    fn stop(&mut self) {
        self.has_value = false;
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

impl BranchTraceSituation for CounterBranchSituation {
    fn state(&self) -> &BranchTraceState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BranchTraceState {
        &mut self.state
    }

    fn init(&mut self, _processor: &dyn Processor, _context: &mut GeneratorContext) {
        self.steps = 0;
    }

    fn step(&mut self) -> Option<Program> {
        if !self.can_insert_step_into_block() && !self.can_insert_step_into_slot() {
            return None;
        }
        self.steps += 1;
        Some(Program::from(vec![Instruction::new(format!(
            "{}.step",
            self.name
        ))]))
    }

    fn prepare(&mut self, _processor: &dyn Processor, _context: &mut GeneratorContext) -> Program {
        tracing::trace!(
            situation = %self.name,
            trace = self.encoded_trace(),
            "prepare branch counter"
        );
        Program::from(vec![Instruction::new(format!("{}.prepare", self.name))])
    }

    fn satisfy_condition(&mut self) {
        self.condition = true;
    }

    fn violate_condition(&mut self) {
        self.condition = false;
    }

    fn clone_branch_box(&self) -> Box<dyn BranchTraceSituation> {
        Box::new(self.clone())
    }

    fn situation(&self) -> &dyn Situation {
        self
    }

    fn situation_mut(&mut self) -> &mut dyn Situation {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::branch::domain::{BranchExecution, BranchSegment, BranchTrace};
    use crate::features::branch::ports::{attach, BranchTraceLookup};
    use crate::shared::models::VariantSituation;
    use crate::shared::models::NamedProcessor;

    #[test]
    fn test_step_requires_coverage() {
        let mut situation = CounterBranchSituation::new("beq");
        assert!(BranchTraceSituation::step(&mut situation).is_none());

        situation.set_block_coverage(Some(BranchSegment::from([2])));
        let step = situation.step().unwrap();
        assert_eq!(step.names(), vec!["beq.step"]);
        assert_eq!(situation.steps(), 1);
    }

    #[test]
    fn test_prepare_encodes_trace() {
        let mut situation = CounterBranchSituation::new("bne");
        let mut trace = BranchTrace::new();
        trace.push(BranchExecution::with_condition(true, true));
        trace.push(BranchExecution::with_condition(true, false));
        situation.set_branch_trace(trace);

        let processor = NamedProcessor::new("mips");
        let mut context = GeneratorContext::default();
        situation.set_condition(true);
        let program = situation.prepare(&processor, &mut context);

        assert!(situation.condition());
        assert_eq!(situation.encoded_trace(), 0b01);
        assert_eq!(program.names(), vec!["bne.prepare"]);
    }

    #[test]
    fn test_lookup_through_attached_situation() {
        let mut situation = attach(Box::new(CounterBranchSituation::new("j")));
        assert_eq!(situation.name(), "j");

        let branch = situation.as_branch_trace_mut().unwrap();
        branch.set_branch_label(4);
        assert_eq!(situation.as_branch_trace().unwrap().state().branch_label, 4);

        let copy = situation.clone();
        situation.next();
        assert!(!situation.has_value());
        assert!(copy.has_value());
        assert_eq!(copy.as_branch_trace().unwrap().state().branch_label, 4);
    }

    #[test]
    fn test_plain_situations_have_no_branch_trace() {
        let plain: Box<dyn Situation> = Box::new(VariantSituation::new("overflow", 2));
        assert!(plain.as_branch_trace().is_none());

        // only attached situations are found
        let bare: Box<dyn Situation> = Box::new(CounterBranchSituation::new("j"));
        assert!(bare.as_branch_trace().is_none());
    }
}
