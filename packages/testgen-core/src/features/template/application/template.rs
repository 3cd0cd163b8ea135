//! Template: product of sections plus template-wide dependencies
//!
//! Axes, innermost to outermost:
//!
//! 1. cross-section dependencies (one iterator per registered section pair)
//! 2. global content dependencies
//! 3. global register dependencies
//! 4. sections (independent-axis product)
//!
//! Global and cross dependencies are rebuilt whenever the section axis moves,
//! since the concatenated program and the ranges sections occupy change with
//! it.

use super::section::Section;
use crate::errors::{GeneratorError, Result};
use crate::features::dependency::{CrossDependencyIterator, DependencyType, SectionDependencyIterator};
use crate::features::iteration::{BoxedEnumerator, Enumerator, ProductIterator};
use crate::shared::models::Program;
use std::collections::BTreeMap;

#[derive(Clone, Default)]
pub struct Template {
    sections: ProductIterator<Program>,
    deps: SectionDependencyIterator,
    cross_types: BTreeMap<(usize, usize), Vec<Box<dyn DependencyType>>>,
    cross: Vec<CrossDependencyIterator>,
    program: Program,
    has_value: bool,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a section; sections are concatenated in registration order
    pub fn register_section(&mut self, section: Section) {
        self.sections.register_iterator(Box::new(section));
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Add a dependency type over the whole concatenated program
    pub fn register_dependency(&mut self, dependency_type: Box<dyn DependencyType>) {
        self.deps.register_dependency(dependency_type);
    }

    /// Add a dependency type from section `first` into section `second`
    ///
    /// Sections may be registered before or after their cross
    /// dependencies; `check_sections` reports pairs naming a missing one.
    ///
    /// # Errors
    /// `UnorderedSections` unless `first < second`.
    pub fn register_cross_dependency(
        &mut self,
        first: usize,
        second: usize,
        dependency_type: Box<dyn DependencyType>,
    ) -> Result<()> {
        if first >= second {
            return Err(GeneratorError::UnorderedSections { first, second });
        }
        self.cross_types
            .entry((first, second))
            .or_default()
            .push(dependency_type);
        Ok(())
    }

    /// Every cross dependency names registered sections
    ///
    /// # Errors
    /// `UnknownSection` for the highest section index past the registered
    /// ones.
    pub fn check_sections(&self) -> Result<()> {
        let count = self.section_count();
        match self.cross_types.keys().map(|&(_, second)| second).max() {
            Some(index) if index >= count => Err(GeneratorError::UnknownSection { index, count }),
            _ => Ok(()),
        }
    }

    /// Settle on the first section combination whose template-wide
    /// dependencies admit a value
    fn settle_sections(&mut self) {
        while self.sections.has_value() {
            if self.rebuild() {
                self.has_value = true;
                return;
            }
            tracing::debug!(
                instructions = self.program.len(),
                "section combination has no dependency assignment, skipped"
            );
            self.sections.next();
        }
        self.has_value = false;
    }

    fn rebuild(&mut self) -> bool {
        let programs = self.sections.value();
        self.program = Program::concat(&programs);

        self.deps.process(&self.program);
        self.deps.init_register();
        self.deps.init_content();

        self.cross = self.build_cross(&programs);
        for cross in &mut self.cross {
            cross.process(&self.program);
            cross.init();
        }

        self.deps.has_register_value()
            && self.deps.has_content_value()
            && self.cross.iter().all(|c| c.has_value())
    }

    fn build_cross(&self, programs: &[Program]) -> Vec<CrossDependencyIterator> {
        // Inclusive start, exclusive end per section
        let mut bounds = Vec::with_capacity(programs.len());
        let mut offset = 0;
        for program in programs {
            bounds.push((offset, offset + program.len()));
            offset += program.len();
        }

        let mut cross = Vec::new();
        for (&(i, j), types) in &self.cross_types {
            let (Some(&(start1, end1)), Some(&(start2, end2))) = (bounds.get(i), bounds.get(j))
            else {
                continue;
            };
            if start1 == end1 || start2 == end2 {
                tracing::debug!(first = i, second = j, "empty section, cross dependency skipped");
                continue;
            }
            match CrossDependencyIterator::with_dependencies(
                start1,
                end1 - 1,
                start2,
                end2 - 1,
                types.iter().cloned(),
            ) {
                Ok(iterator) => cross.push(iterator),
                Err(err) => tracing::debug!(error = %err, "cross dependency skipped"),
            }
        }
        cross
    }

    fn next_cross(&mut self) -> bool {
        for cross in self.cross.iter_mut().rev() {
            cross.next();
            if cross.has_value() {
                return true;
            }
            cross.init();
        }
        false
    }
}

impl Enumerator for Template {
    type Item = Program;

    fn init(&mut self) {
        self.sections.init();
        if let Err(err) = self.check_sections() {
            tracing::warn!(error = %err, "template has no programs");
            self.has_value = false;
            return;
        }
        self.settle_sections();
    }

    fn has_value(&self) -> bool {
        self.has_value
    }

    fn value(&self) -> Program {
        assert!(self.has_value, "value() on exhausted template");
        let mut program = self.program.clone();
        self.deps.apply(&mut program);
        for cross in &self.cross {
            cross.apply(&mut program);
        }
        program
    }

    fn next(&mut self) {
        assert!(self.has_value, "next() on exhausted template");

        if self.next_cross() {
            return;
        }

        self.deps.next_content();
        if self.deps.has_content_value() {
            return;
        }
        self.deps.init_content();

        self.deps.next_register();
        if self.deps.has_register_value() {
            return;
        }
        self.deps.init_register();

        self.sections.next();
        self.settle_sections();
    }

    fn stop(&mut self) {
        self.has_value = false;
    }

    fn clone_box(&self) -> BoxedEnumerator<Program> {
        Box::new(self.clone())
    }
}
