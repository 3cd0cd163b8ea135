//! Branch template iterator
//!
//! Structural enumerator that turns branch structures and their traces into
//! programs:
//!
//! 1. Registered instructions are split into branch classes and non-branch
//!    classes; non-branch classes serve both basic blocks and delay slots,
//!    their non-throwing members also form the safe delay slot classes.
//! 2. For every structure, a fresh trace search runs; structures without a
//!    feasible trace are skipped.
//! 3. Every trace becomes a program with one instruction per structure
//!    entry. Branches get a copy of the trace situation registered for
//!    their name, configured with their position, target, trace and
//!    coverage.
//! 4. `construct` adds target labels, the step programs of every branch
//!    (into covered blocks or into the delay slot) and the prepare
//!    programs that set the initial conditions.

use crate::config::{BranchTraceConfig, CompositionConfig, ValidatedConfig};
use crate::errors::{GeneratorError, Result};
use crate::features::branch::application::{
    BranchStructureIterator, BranchTraceIterator, StructureClasses,
};
use crate::features::branch::domain::BranchStructure;
use crate::features::branch::ports::{attach, BranchTraceLookup, BranchTraceSituation};
use crate::features::iteration::{BoxedEnumerator, Enumerator};
use crate::features::template::{InstructionClasses, TemplateIterator};
use crate::shared::models::{GeneratorContext, Instruction, Processor, Program};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone)]
pub struct BranchTemplateIterator {
    trace_config: BranchTraceConfig,
    composition: CompositionConfig,
    /// Conditional classes first, then unconditional ones
    branches: InstructionClasses,
    all_slots: InstructionClasses,
    safe_slots: InstructionClasses,
    safe_instructions: Vec<Instruction>,
    all_blocks: InstructionClasses,
    situations: FxHashMap<String, Box<dyn BranchTraceSituation>>,
    structures: BranchStructureIterator,
    traces: Option<BranchTraceIterator>,
    seed: u64,
    rng: StdRng,
    program: Program,
    has_value: bool,
}

impl BranchTemplateIterator {
    /// Build from `(class, instruction)` pairs and the trace situations
    /// of the branch instructions, keyed by instruction name
    pub fn new(
        config: &ValidatedConfig,
        instructions: impl IntoIterator<Item = (String, Instruction)>,
        situations: FxHashMap<String, Box<dyn BranchTraceSituation>>,
    ) -> Result<Self> {
        let mut conditional = InstructionClasses::new();
        let mut unconditional = InstructionClasses::new();
        let mut all_slots = InstructionClasses::new();
        let mut safe_slots = InstructionClasses::new();
        let mut safe_instructions = Vec::new();
        let mut all_blocks = InstructionClasses::new();

        for (class, instruction) in instructions {
            if instruction.is_branch() {
                if !situations.contains_key(&instruction.name) {
                    return Err(GeneratorError::MissingSituation(instruction.name.clone()));
                }
                let (same, other) = if instruction.is_conditional_branch() {
                    (&mut conditional, &unconditional)
                } else {
                    (&mut unconditional, &conditional)
                };
                if other.class_index(&class).is_some() {
                    return Err(GeneratorError::template(format!(
                        "class '{class}' mixes conditional and unconditional branches"
                    )));
                }
                same.register(&class, instruction);
                continue;
            }

            all_slots.register(&class, instruction.clone());
            all_blocks.register(&class, instruction.clone());
            if instruction.can_throw_exception() {
                safe_slots.register_class(&class);
            } else {
                safe_slots.register(&class, instruction.clone());
                safe_instructions.push(instruction);
            }
        }

        let classes = StructureClasses {
            if_then: conditional.len(),
            goto: unconditional.len(),
            block: all_blocks.len(),
            slot: all_slots.len(),
        };

        let mut branches = conditional;
        for class in unconditional.iter() {
            for instruction in class.instructions() {
                branches.register(class.name(), instruction.clone());
            }
        }

        let structures = BranchStructureIterator::new(&config.structure(), classes)?;

        tracing::debug!(
            branch_classes = branches.len(),
            block_classes = all_blocks.len(),
            safe_instructions = safe_instructions.len(),
            config = %config.describe(),
            "branch template iterator ready"
        );

        let mut iterator = Self {
            trace_config: config.trace(),
            composition: config.composition(),
            branches,
            all_slots,
            safe_slots,
            safe_instructions,
            all_blocks,
            situations,
            structures,
            traces: None,
            seed: config.seed(),
            rng: StdRng::seed_from_u64(config.seed()),
            program: Program::new(),
            has_value: false,
        };
        iterator.init();
        Ok(iterator)
    }

    /// Structure and traces behind the current program
    pub fn structure(&self) -> Option<&BranchStructure> {
        self.traces.as_ref().map(BranchTraceIterator::structure)
    }

    /// Move to the first structure (from the current one) with a trace
    fn settle_structure(&mut self) -> bool {
        while self.structures.has_value() {
            let seed = self.rng.gen();
            let mut traces =
                BranchTraceIterator::from_config(self.structures.value(), &self.trace_config, seed);
            traces.init();

            if traces.has_value() {
                self.traces = Some(traces);
                return true;
            }

            tracing::debug!(
                structure = %self.structures.value(),
                "structure skipped: no feasible trace"
            );
            self.structures.next();
        }
        self.traces = None;
        false
    }

    fn random(classes: &InstructionClasses, class: usize, rng: &mut StdRng) -> Instruction {
        classes
            .class(class)
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| Instruction::new(classes.class(class).name()))
    }

    fn random_safe_slot(&mut self, class: usize) -> Instruction {
        if let Some(instruction) = self.safe_slots.class(class).choose(&mut self.rng) {
            return instruction.clone();
        }
        if let Some(instruction) = self.safe_instructions.choose(&mut self.rng) {
            return instruction.clone();
        }
        tracing::warn!(
            class = self.all_slots.class(class).name(),
            "no instruction is safe in a delay slot; using an unsafe one"
        );
        Self::random(&self.all_slots, class, &mut self.rng)
    }

    /// Whether an exception in the delay slot of `branch` could loop
    /// forever: the branch skips past its slot and some later branch
    /// jumps backward
    fn can_exception_cause_looping(structure: &BranchStructure, branch: usize) -> bool {
        let label = structure[branch].label();
        if label == branch + 1 || label == branch + 2 {
            return false;
        }
        (branch + 2..structure.len())
            .any(|i| structure[i].is_branch() && structure[i].label() <= i)
    }

    fn materialize(&mut self) {
        let Some(structure) = self.structure().cloned() else {
            self.program = Program::new();
            return;
        };

        let mut program = Program::new();
        let mut branch_number = 0;

        for (i, entry) in structure.iter().enumerate() {
            if entry.is_branch() {
                let mut instruction = Self::random(&self.branches, entry.group(), &mut self.rng);
                if let Some(situation) = self.situations.get(&instruction.name) {
                    let mut situation = situation.clone();
                    situation.set_branch_number(branch_number);
                    situation.set_branch_index(i);
                    situation.set_branch_label(entry.label());
                    situation.set_branch_trace(entry.trace().clone());
                    situation.set_block_coverage(entry.block_coverage().cloned());
                    situation.set_slot_coverage(entry.slot_coverage().cloned());
                    instruction.situation = Some(attach(situation));
                }
                branch_number += 1;
                program.append(instruction);
            } else if entry.is_basic_block() {
                program.append(Self::random(&self.all_blocks, entry.group(), &mut self.rng));
            } else {
                let safe = self.composition.no_unsafe_delay_slots
                    || (self.composition.no_unsafe_delay_slots_if_looping
                        && i > 0
                        && Self::can_exception_cause_looping(&structure, i - 1));
                let instruction = if safe {
                    self.random_safe_slot(entry.group())
                } else {
                    Self::random(&self.all_slots, entry.group(), &mut self.rng)
                };
                program.append(instruction);
            }
        }

        self.program = program;
    }
}

impl Enumerator for BranchTemplateIterator {
    type Item = Program;

    fn init(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.structures.init();
        self.has_value = self.settle_structure();
        if self.has_value {
            self.materialize();
        }
    }

    fn has_value(&self) -> bool {
        self.has_value
    }

    fn value(&self) -> Program {
        assert!(self.has_value, "value() on exhausted branch template iterator");
        self.program.clone()
    }

    fn next(&mut self) {
        assert!(self.has_value, "next() on exhausted branch template iterator");

        if let Some(traces) = self.traces.as_mut() {
            traces.next();
            if traces.has_value() {
                self.materialize();
                return;
            }
        }

        self.structures.next();
        self.has_value = self.settle_structure();
        if self.has_value {
            self.materialize();
        }
    }

    fn stop(&mut self) {
        self.has_value = false;
    }

    fn clone_box(&self) -> BoxedEnumerator<Program> {
        Box::new(self.clone())
    }
}

impl TemplateIterator for BranchTemplateIterator {
    fn construct(
        &mut self,
        processor: &dyn Processor,
        context: &mut GeneratorContext,
        template: &mut Program,
    ) -> bool {
        // fresh labels: positions are template relative
        context.reset();

        // position -> program inserted before it
        let mut steps: BTreeMap<usize, Program> = BTreeMap::new();
        let mut slots: BTreeSet<usize> = BTreeSet::new();
        let mut prepares = Program::new();

        for i in 0..template.len() {
            let Some(instruction) = template.get_mut(i) else {
                break;
            };
            if !instruction.is_branch() {
                continue;
            }
            let nullifies = instruction.nullifies_delay_slot();
            let Some(situation) = instruction
                .situation_mut()
                .and_then(|s| s.as_branch_trace_mut())
            else {
                tracing::debug!(position = i, "branch without trace situation");
                context.reset();
                return false;
            };

            let label = situation.state().branch_label;
            let text = format!("{}:", context.label(label));
            let target = steps.entry(label).or_default();
            let labelled = target
                .get(0)
                .and_then(|first| first.pseudo.as_deref())
                .is_some_and(|pseudo| pseudo == text);
            if !labelled {
                target.insert(0, Instruction::label(text));
            }

            situation.init(processor, context);

            if situation.can_insert_step_into_block() {
                let coverage = situation.state().block_coverage.clone().unwrap_or_default();
                for block in coverage {
                    let Some(step) = situation.step() else {
                        context.reset();
                        return false;
                    };
                    if !step.is_empty() {
                        steps.entry(block).or_default().extend(step);
                    }
                }
            } else {
                if nullifies || !situation.can_insert_step_into_slot() {
                    context.reset();
                    return false;
                }
                let Some(step) = situation.step() else {
                    context.reset();
                    return false;
                };
                if !step.is_empty() {
                    // a delay slot holds exactly one instruction
                    if step.len() > 1 {
                        context.reset();
                        return false;
                    }
                    steps.entry(i + 1).or_default().extend(step);
                    slots.insert(i + 1);
                }
            }

            let first = situation
                .state()
                .branch_trace
                .get(0)
                .map_or(true, |e| e.condition());
            situation.set_condition(first);
            prepares.extend(situation.prepare(processor, context));
        }

        let mut correction = 0;
        for (position, program) in steps {
            let at = position + correction;
            let len = program.len();
            template.insert_program(at, program);
            correction += len;

            // the step takes the place of the delay slot instruction
            if slots.contains(&position) {
                template.remove(at + len);
                correction -= 1;
            }
        }

        template.insert_program(0, prepares);
        true
    }

    fn clone_template(&self) -> Box<dyn TemplateIterator> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeneratorConfig, Preset};
    use crate::features::branch::infrastructure::CounterBranchSituation;
    use crate::shared::models::NamedProcessor;

    fn situations(names: &[&str]) -> FxHashMap<String, Box<dyn BranchTraceSituation>> {
        names
            .iter()
            .map(|&name| {
                (
                    name.to_string(),
                    Box::new(CounterBranchSituation::new(name)) as Box<dyn BranchTraceSituation>,
                )
            })
            .collect()
    }

    fn instructions() -> Vec<(String, Instruction)> {
        vec![
            ("beq".to_string(), Instruction::new("beq").conditional_branch()),
            ("j".to_string(), Instruction::new("j").unconditional_branch()),
            ("alu".to_string(), Instruction::new("add")),
            ("mem".to_string(), Instruction::new("lw").throwing(true)),
        ]
    }

    fn fast_config() -> ValidatedConfig {
        GeneratorConfig::preset(Preset::Fast).seed(3).build().unwrap()
    }

    #[test]
    fn test_missing_situation_is_an_error() {
        let result = BranchTemplateIterator::new(&fast_config(), instructions(), situations(&["beq"]));
        assert!(matches!(result, Err(GeneratorError::MissingSituation(ref name)) if name == "j"));
    }

    #[test]
    fn test_mixed_branch_class_is_an_error() {
        let instructions = vec![
            ("br".to_string(), Instruction::new("beq").conditional_branch()),
            ("br".to_string(), Instruction::new("j").unconditional_branch()),
        ];
        let result =
            BranchTemplateIterator::new(&fast_config(), instructions, situations(&["beq", "j"]));
        assert!(matches!(result, Err(GeneratorError::Template(_))));
    }

    #[test]
    fn test_programs_follow_structures() {
        let mut iterator =
            BranchTemplateIterator::new(&fast_config(), instructions(), situations(&["beq", "j"]))
                .unwrap();

        let mut count = 0;
        while iterator.has_value() && count < 64 {
            let program = iterator.value();
            let structure = iterator.structure().unwrap();
            assert_eq!(program.len(), structure.len());

            for (instruction, entry) in program.iter().zip(structure.iter()) {
                assert_eq!(instruction.is_branch(), entry.is_branch());
                if entry.is_branch() {
                    let state = instruction.situation().unwrap().as_branch_trace().unwrap().state();
                    assert_eq!(state.branch_label, entry.label());
                    assert_eq!(&state.branch_trace, entry.trace());
                }
            }
            iterator.next();
            count += 1;
        }
        assert!(count > 0);
    }

    #[test]
    fn test_construct_inserts_label_steps_and_prepare() {
        let config = GeneratorConfig::preset(Preset::Fast)
            .structure(|c| c.min_length(3).max_length(3))
            .build()
            .unwrap();
        let mut iterator =
            BranchTemplateIterator::new(&config, instructions(), situations(&["beq", "j"]))
                .unwrap();
        let processor = NamedProcessor::new("mips");

        while iterator.has_value() {
            let mut template = iterator.value();
            let branches = template.iter().filter(|i| i.is_branch()).count();
            let targets: BTreeSet<usize> = template
                .iter()
                .filter_map(|i| i.situation().and_then(|s| s.as_branch_trace()))
                .map(|s| s.state().branch_label)
                .collect();
            let mut context = GeneratorContext::default();

            if iterator.construct(&processor, &mut context, &mut template) {
                let labels = template.iter().filter(|i| i.is_pseudo()).count();
                let prepares = template
                    .iter()
                    .filter(|i| i.name.ends_with(".prepare"))
                    .count();
                assert_eq!(labels, targets.len());
                assert_eq!(prepares, branches);
                assert!(template.get(0).unwrap().name.ends_with(".prepare"));
            }
            iterator.next();
        }
    }

    #[test]
    fn test_shared_target_gets_one_label() {
        let branch = |instruction: Instruction, index: usize| {
            let mut situation = CounterBranchSituation::new(instruction.name.clone());
            situation.set_branch_index(index);
            situation.set_branch_label(2);
            situation.set_block_coverage(Some(Default::default()));
            instruction.with_situation(attach(Box::new(situation)))
        };
        let mut template = Program::from(vec![
            branch(Instruction::new("beq").conditional_branch(), 0),
            branch(Instruction::new("j").unconditional_branch(), 1),
            Instruction::new("add"),
        ]);
        let mut iterator =
            BranchTemplateIterator::new(&fast_config(), instructions(), situations(&["beq", "j"]))
                .unwrap();
        let mut context = GeneratorContext::default();

        assert!(iterator.construct(&NamedProcessor::new("mips"), &mut context, &mut template));
        assert_eq!(template.iter().filter(|i| i.is_pseudo()).count(), 1);
        assert_eq!(
            template.names(),
            vec!["beq.prepare", "j.prepare", "beq", "j", "L0:", "add"]
        );
    }

    #[test]
    fn test_init_is_idempotent() {
        let mut iterator =
            BranchTemplateIterator::new(&fast_config(), instructions(), situations(&["beq", "j"]))
                .unwrap();
        iterator.next();
        let second = iterator.value().names().join(" ");

        iterator.init();
        iterator.next();
        assert_eq!(iterator.value().names().join(" "), second);
    }

    #[test]
    fn test_looping_delay_slot_detection() {
        use crate::features::branch::domain::BranchEntry;

        // 0: if goto 4, 1: slot, 2: block, 3: goto 0, 4: slot
        let structure = BranchStructure::new(vec![
            BranchEntry::branch(true, 0, 4),
            BranchEntry::delay_slot(0),
            BranchEntry::basic_block(0),
            BranchEntry::branch(false, 0, 0),
            BranchEntry::delay_slot(0),
        ]);
        assert!(BranchTemplateIterator::can_exception_cause_looping(&structure, 0));
        assert!(!BranchTemplateIterator::can_exception_cause_looping(&structure, 3));
    }
}
