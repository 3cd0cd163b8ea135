//! Branch Enumeration Benchmarks
//!
//! Measures:
//! 1. Structure enumeration per branch budget
//! 2. Trace search per execution bound
//! 3. Full branch template enumeration (structures, traces, programs)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rustc_hash::FxHashMap;
use testgen_core::config::{BranchStructureConfig, GeneratorConfig, Preset};
use testgen_core::features::branch::{CounterBranchSituation, StructureClasses};
use testgen_core::{
    BranchEntry, BranchStructure, BranchStructureIterator, BranchTemplateIterator,
    BranchTraceIterator, BranchTraceSituation, Enumerator, Instruction,
};

fn classes() -> StructureClasses {
    StructureClasses {
        if_then: 2,
        goto: 1,
        block: 2,
        slot: 2,
    }
}

/// Nested loops: `0: block, 1: if goto 0, 2: block, 3: if goto 0, 4: if goto 6, 5: block, 6: block`
fn nested_loops() -> BranchStructure {
    BranchStructure::new(vec![
        BranchEntry::basic_block(0),
        BranchEntry::branch(true, 0, 0),
        BranchEntry::basic_block(0),
        BranchEntry::branch(true, 0, 0),
        BranchEntry::branch(true, 0, 6),
        BranchEntry::basic_block(0),
        BranchEntry::basic_block(0),
    ])
}

fn bench_structures(c: &mut Criterion) {
    let mut group = c.benchmark_group("structure_enumeration");

    for branches in [1usize, 2] {
        let config = BranchStructureConfig::default()
            .min_branch_number(1)
            .max_branch_number(branches)
            .max_length(2 * branches + 1);

        group.bench_with_input(BenchmarkId::from_parameter(branches), &config, |b, config| {
            b.iter(|| {
                let mut iterator = BranchStructureIterator::new(config, classes()).unwrap();
                let mut count = 0usize;
                while iterator.has_value() {
                    black_box(iterator.value());
                    iterator.next();
                    count += 1;
                }
                count
            });
        });
    }

    group.finish();
}

fn bench_traces(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace_search");

    for executions in [1usize, 2, 3, 4] {
        group.bench_with_input(
            BenchmarkId::from_parameter(executions),
            &executions,
            |b, &executions| {
                b.iter(|| {
                    let mut iterator =
                        BranchTraceIterator::new(nested_loops(), executions).with_seed(1);
                    iterator.init();
                    let mut count = 0usize;
                    while iterator.has_value() {
                        black_box(iterator.structure());
                        iterator.next();
                        count += 1;
                    }
                    count
                });
            },
        );
    }

    group.finish();
}

fn bench_templates(c: &mut Criterion) {
    let isa = vec![
        ("beq".to_string(), Instruction::new("beq").conditional_branch()),
        ("j".to_string(), Instruction::new("j").unconditional_branch()),
        ("alu".to_string(), Instruction::new("add")),
        ("mem".to_string(), Instruction::new("lw").throwing(true)),
    ];
    let situations: FxHashMap<String, Box<dyn BranchTraceSituation>> = ["beq", "j"]
        .into_iter()
        .map(|name| {
            (
                name.to_string(),
                Box::new(CounterBranchSituation::new(name)) as Box<dyn BranchTraceSituation>,
            )
        })
        .collect();
    let config = GeneratorConfig::preset(Preset::Fast).seed(1).build().unwrap();

    c.bench_function("branch_templates_fast", |b| {
        b.iter(|| {
            let mut iterator =
                BranchTemplateIterator::new(&config, isa.clone(), situations.clone()).unwrap();
            let mut count = 0usize;
            while iterator.has_value() {
                black_box(iterator.value());
                iterator.next();
                count += 1;
            }
            count
        });
    });
}

criterion_group!(benches, bench_structures, bench_traces, bench_templates);
criterion_main!(benches);
