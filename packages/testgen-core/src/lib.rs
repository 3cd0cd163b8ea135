/*
 * testgen-core - Combinatorial Test-Program Generation Engine
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (Instruction, Operand, Program, Situation)
 * - features/    : Vertical slices (iteration → dependency → template → branch)
 * - config/      : Presets, stage configs, YAML
 *
 * Enumeration model:
 * - Pull-based, single cursor per iterator, restartable via init()
 * - Composite iterators are odometers over boxed child iterators
 * - Every random choice goes through an explicitly seeded StdRng
 */

#![allow(clippy::new_without_default)] // Default impl not always meaningful for iterators
#![allow(clippy::should_implement_trait)] // from_str naming intentional
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::needless_range_loop)] // Range loop for index-addressed arenas

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and macros
#[macro_use]
pub mod shared;

/// Error types
pub mod errors;

/// Configuration (presets, stage configs, YAML)
pub mod config;

/// Feature slices
pub mod features;

pub use errors::{GeneratorError, Result};

// Most used entry points
pub use features::branch::{
    BranchEntry, BranchEntryKind, BranchExecution, BranchStructure, BranchStructureIterator,
    BranchTemplateIterator, BranchTrace, BranchTraceConstructor, BranchTraceIterator,
    BranchTraceSituation,
};
pub use features::dependency::{
    CrossDependencyIterator, Dependency, DependencyIterator, DependencyType,
    RegisterDependencyType, SectionDependencyIterator,
};
pub use features::iteration::{
    BooleanIterator, BoxedEnumerator, Enumerator, ProductIterator, RangeIterator, SampleIterator,
};
pub use features::template::{Section, Template, TemplateIterator};
pub use shared::models::{
    GeneratorContext, Instruction, Operand, OperandId, Processor, Program, Situation,
};
