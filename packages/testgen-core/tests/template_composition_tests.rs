//! Sections and templates over sequence, product and branch enumerators

mod common;

use common::*;
use pretty_assertions::assert_eq;
use testgen_core::config::{GeneratorConfig, Preset};
use testgen_core::features::branch::BranchTraceLookup;
use testgen_core::features::iteration::collect_values;
use testgen_core::features::template::{
    InstructionClasses, ProductTemplateIterator, SequenceTemplateIterator,
};
use testgen_core::shared::models::VariantSituation;
use testgen_core::{
    BranchTemplateIterator, Enumerator, Instruction, Program, RegisterDependencyType, Section,
    Template,
};

fn branch_section(config: &GeneratorConfig) -> Section {
    let config = config.clone().build().unwrap();
    let iterator = BranchTemplateIterator::new(&config, branch_isa(), branch_situations()).unwrap();
    Section::new(processor(), context(), Box::new(iterator))
}

#[test]
fn branch_section_programs_are_constructed() {
    let mut section = branch_section(&GeneratorConfig::preset(Preset::Fast).seed(11));
    section.init();

    let programs = collect_values(&mut section);
    assert!(!programs.is_empty());

    for program in &programs {
        let branches: Vec<&Instruction> = program.iter().filter(|i| i.is_branch()).collect();
        let prepares = program
            .iter()
            .take_while(|i| i.name.ends_with(".prepare"))
            .count();
        assert_eq!(prepares, branches.len(), "{program}");

        // every branch target carries a label
        let labels = program.iter().filter(|i| i.is_pseudo()).count();
        assert!(labels >= 1 && labels <= branches.len(), "{program}");
        for label in program.iter().filter(|i| i.is_pseudo()) {
            assert!(label.name.starts_with('L') && label.name.ends_with(':'));
        }
    }
}

#[test]
fn branch_section_steps_follow_coverage() {
    let mut section = branch_section(
        &GeneratorConfig::preset(Preset::Balanced)
            .seed(5)
            .structure(|c| c.max_length(3).max_branch_number(1))
            .trace(|c| c.max_branch_execution(2)),
    );
    section.init();

    for program in collect_values(&mut section) {
        let situation = program
            .iter()
            .find_map(|i| i.situation().and_then(|s| s.as_branch_trace()))
            .unwrap();
        let state = situation.state();
        let changes = state.branch_trace.change_count();
        let steps = program
            .iter()
            .filter(|i| i.name.ends_with(".step"))
            .count();

        // one step per covered block, or one in the delay slot
        let expected = state
            .block_coverage
            .as_ref()
            .map_or(0, |coverage| coverage.len());
        assert_eq!(steps, expected, "{program}");
        if changes > 0 {
            assert!(steps > 0, "outcome change without a step:\n{program}");
        }
    }
}

#[test]
fn section_enumerates_situation_variants() {
    let program: Program = vec![Instruction::new("add")
        .with_situation(Box::new(VariantSituation::new("overflow", 3)))]
    .into();
    let mut section = Section::new(
        processor(),
        context(),
        Box::new(SequenceTemplateIterator::new(program)),
    );
    section.init();

    assert_eq!(collect_values(&mut section).len(), 3);
}

#[test]
fn template_concatenates_sections_in_order() {
    let mut classes = InstructionClasses::new();
    classes.register("alu", Instruction::new("add"));
    classes.register("mem", Instruction::new("lw"));
    let product = ProductTemplateIterator::new(2, classes).unwrap();

    let mut template = Template::new();
    template.register_section(Section::new(
        processor(),
        context(),
        Box::new(SequenceTemplateIterator::new(vec![Instruction::new("nop")].into())),
    ));
    template.register_section(Section::new(processor(), context(), Box::new(product)));
    template.init();

    let programs = collect_values(&mut template);
    assert_eq!(programs.len(), 4);
    for program in &programs {
        assert_eq!(program.len(), 3);
        assert_eq!(program.names()[0], "nop");
    }
}

#[test]
fn template_combines_branch_section_with_dependencies() {
    let prologue = Section::new(
        processor(),
        context(),
        Box::new(SequenceTemplateIterator::new(
            vec![writer("add", 1), reader("sub", 2)].into(),
        )),
    );

    let mut template = Template::new();
    template.register_section(prologue);
    template.register_section(branch_section(&GeneratorConfig::preset(Preset::Fast).seed(2)));
    template.register_dependency(Box::new(RegisterDependencyType::new()));
    template.init();

    let programs = collect_values(&mut template);
    assert!(!programs.is_empty());

    // register axis is innermost over the section product
    let dependent = programs
        .iter()
        .filter(|p| p.instructions()[1].operands[0].value == Some(1))
        .count();
    assert_eq!(dependent * 2, programs.len());
    for program in &programs {
        assert_eq!(&program.names()[..2], &["add", "sub"]);
        assert!(program.iter().any(|i| i.is_branch()));
    }
}

#[test]
fn yaml_config_drives_branch_template() {
    let yaml = r#"
version: 1
preset: fast
seed: 9
overrides:
  trace:
    max_branch_execution: 2
"#;
    let config = GeneratorConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.trace().max_branch_execution, 2);

    let mut iterator =
        BranchTemplateIterator::new(&config, branch_isa(), branch_situations()).unwrap();
    let first = iterator.value();
    iterator.init();
    assert_eq!(iterator.value().names(), first.names());
}
