//! Section dependency iterator
//!
//! Composes the dependency iterators of a section (or a whole template) with
//! the same odometer discipline as a single iterator, partitioned into a
//! register subset and a content subset. The two subsets are independent
//! axes so sections can nest situations between them.

use super::dependency_iterator::DependencyIterator;
use crate::features::dependency::domain::DependencyLink;
use crate::features::dependency::ports::DependencyType;
use crate::features::iteration::{BoxedEnumerator, Enumerator};
use crate::shared::models::Program;

/// Odometer over a list of dependency iterators (last is innermost)
#[derive(Debug, Clone, Default)]
struct DependencyGroup {
    iterators: Vec<DependencyIterator>,
    has_value: bool,
}

impl DependencyGroup {
    fn init(&mut self) {
        self.has_value = true;
        for iterator in &mut self.iterators {
            iterator.init();
            if !iterator.has_value() {
                self.has_value = false;
            }
        }
    }

    fn next(&mut self) {
        assert!(self.has_value, "next() on exhausted dependency group");
        for iterator in self.iterators.iter_mut().rev() {
            iterator.next();
            if iterator.has_value() {
                return;
            }
            iterator.init();
        }
        self.has_value = false;
    }

    fn value(&self) -> Vec<DependencyLink> {
        self.iterators.iter().flat_map(|i| i.value()).collect()
    }

    fn apply(&self, program: &mut Program) {
        for iterator in &self.iterators {
            iterator.apply(program);
        }
    }
}

/// Register and content dependency cursors of one section
#[derive(Debug, Clone, Default)]
pub struct SectionDependencyIterator {
    register: DependencyGroup,
    content: DependencyGroup,
}

impl SectionDependencyIterator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dependencies(types: impl IntoIterator<Item = Box<dyn DependencyType>>) -> Self {
        let mut deps = Self::new();
        for dependency_type in types {
            deps.register_dependency(dependency_type);
        }
        deps
    }

    /// Add a dependency type; it joins the register or content subset
    pub fn register_dependency(&mut self, dependency_type: Box<dyn DependencyType>) {
        let iterator = DependencyIterator::new(dependency_type);
        if iterator.is_register_dependency() {
            self.register.iterators.push(iterator);
        } else {
            self.content.iterators.push(iterator);
        }
    }

    pub fn dependency_count(&self) -> usize {
        self.register.iterators.len() + self.content.iterators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependency_count() == 0
    }

    /// Rebuild every instance over `program`
    pub fn process(&mut self, program: &Program) {
        for iterator in self.iterators_mut() {
            iterator.process(program);
        }
    }

    /// Rebuild every instance over two index ranges of `program`
    pub fn process_range(
        &mut self,
        program: &Program,
        start1: usize,
        end1: usize,
        start2: usize,
        end2: usize,
    ) {
        for iterator in self.iterators_mut() {
            iterator.process_range(program, start1, end1, start2, end2);
        }
    }

    fn iterators_mut(&mut self) -> impl Iterator<Item = &mut DependencyIterator> {
        self.register
            .iterators
            .iter_mut()
            .chain(self.content.iterators.iter_mut())
    }

    pub fn init_register(&mut self) {
        self.register.init();
    }

    pub fn has_register_value(&self) -> bool {
        self.register.has_value
    }

    pub fn next_register(&mut self) {
        self.register.next();
    }

    pub fn register_value(&self) -> Vec<DependencyLink> {
        assert!(self.register.has_value, "register_value() on exhausted iterator");
        self.register.value()
    }

    pub fn init_content(&mut self) {
        self.content.init();
    }

    pub fn has_content_value(&self) -> bool {
        self.content.has_value
    }

    pub fn next_content(&mut self) {
        self.content.next();
    }

    pub fn content_value(&self) -> Vec<DependencyLink> {
        assert!(self.content.has_value, "content_value() on exhausted iterator");
        self.content.value()
    }

    /// Realize the active register and content dependencies on `program`
    pub fn apply(&self, program: &mut Program) {
        self.register.apply(program);
        self.content.apply(program);
    }
}

impl Enumerator for SectionDependencyIterator {
    type Item = Vec<DependencyLink>;

    fn init(&mut self) {
        self.init_register();
        self.init_content();
    }

    fn has_value(&self) -> bool {
        self.register.has_value && self.content.has_value
    }

    fn value(&self) -> Vec<DependencyLink> {
        assert!(self.has_value(), "value() on exhausted section dependencies");
        let mut links = self.register.value();
        links.extend(self.content.value());
        links
    }

    fn next(&mut self) {
        assert!(self.has_value(), "next() on exhausted section dependencies");
        self.next_content();
        if self.has_content_value() {
            return;
        }
        self.next_register();
        if self.has_register_value() {
            self.init_content();
        }
    }

    fn stop(&mut self) {
        self.register.has_value = false;
        self.content.has_value = false;
    }

    fn clone_box(&self) -> BoxedEnumerator<Vec<DependencyLink>> {
        Box::new(self.clone())
    }
}
