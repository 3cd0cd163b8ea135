//! Cross-section dependency iterator
//!
//! Section dependencies restricted to determinants in `[start1, end1]` and
//! dependents in `[start2, end2]` of a concatenated template. The ranges
//! must be ordered and disjoint.

use super::section_dependency_iterator::SectionDependencyIterator;
use crate::errors::{GeneratorError, Result};
use crate::features::dependency::domain::DependencyLink;
use crate::features::dependency::ports::DependencyType;
use crate::features::iteration::{BoxedEnumerator, Enumerator};
use crate::shared::models::Program;

#[derive(Debug, Clone)]
pub struct CrossDependencyIterator {
    start1: usize,
    end1: usize,
    start2: usize,
    end2: usize,
    deps: SectionDependencyIterator,
}

impl CrossDependencyIterator {
    /// # Errors
    /// `InvalidRange` unless `start1 <= end1`, `start2 <= end2` and
    /// `end1 < start2`.
    pub fn new(start1: usize, end1: usize, start2: usize, end2: usize) -> Result<Self> {
        let reason = if start1 > end1 {
            Some("determinant range is empty")
        } else if start2 > end2 {
            Some("dependent range is empty")
        } else if end1 >= start2 {
            Some("ranges overlap")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(GeneratorError::invalid_range(start1, end1, start2, end2, reason));
        }

        Ok(Self {
            start1,
            end1,
            start2,
            end2,
            deps: SectionDependencyIterator::new(),
        })
    }

    pub fn with_dependencies(
        start1: usize,
        end1: usize,
        start2: usize,
        end2: usize,
        types: impl IntoIterator<Item = Box<dyn DependencyType>>,
    ) -> Result<Self> {
        let mut cross = Self::new(start1, end1, start2, end2)?;
        for dependency_type in types {
            cross.register_dependency(dependency_type);
        }
        Ok(cross)
    }

    pub fn register_dependency(&mut self, dependency_type: Box<dyn DependencyType>) {
        self.deps.register_dependency(dependency_type);
    }

    pub fn determinant_range(&self) -> (usize, usize) {
        (self.start1, self.end1)
    }

    pub fn dependent_range(&self) -> (usize, usize) {
        (self.start2, self.end2)
    }

    /// Rebuild instances over the two ranges of `program`
    pub fn process(&mut self, program: &Program) {
        self.deps
            .process_range(program, self.start1, self.end1, self.start2, self.end2);
    }

    pub fn apply(&self, program: &mut Program) {
        self.deps.apply(program);
    }
}

impl Enumerator for CrossDependencyIterator {
    type Item = Vec<DependencyLink>;

    fn init(&mut self) {
        self.deps.init();
    }

    fn has_value(&self) -> bool {
        self.deps.has_value()
    }

    fn value(&self) -> Vec<DependencyLink> {
        self.deps.value()
    }

    fn next(&mut self) {
        self.deps.next();
    }

    fn stop(&mut self) {
        self.deps.stop();
    }

    fn clone_box(&self) -> BoxedEnumerator<Vec<DependencyLink>> {
        Box::new(self.clone())
    }
}
