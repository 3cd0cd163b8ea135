//! Template section
//!
//! A section chains four axes over one structural enumerator. From the
//! innermost to the outermost:
//!
//! 1. content dependencies
//! 2. situations of the realized program
//! 3. register dependencies
//! 4. structure (the template iterator, filtered by `construct`)
//!
//! Exhausting an axis resets it and advances the next outer one; exhausting
//! the structure stops the section. Structures whose `construct` fails, or
//! whose situations or dependencies admit no value, are skipped.

use super::situation_iterator::SituationIterator;
use crate::features::dependency::{DependencyType, SectionDependencyIterator};
use crate::features::iteration::{BoxedEnumerator, Enumerator};
use crate::features::template::ports::TemplateIterator;
use crate::shared::models::{GeneratorContext, Processor, Program};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone)]
pub struct Section {
    processor: Rc<dyn Processor>,
    context: Rc<RefCell<GeneratorContext>>,
    iterator: Box<dyn TemplateIterator>,
    template: Program,
    situations: SituationIterator,
    deps: SectionDependencyIterator,
    has_value: bool,
}

impl Section {
    pub fn new(
        processor: Rc<dyn Processor>,
        context: Rc<RefCell<GeneratorContext>>,
        iterator: Box<dyn TemplateIterator>,
    ) -> Self {
        Self {
            processor,
            context,
            iterator,
            template: Program::new(),
            situations: SituationIterator::new(),
            deps: SectionDependencyIterator::new(),
            has_value: false,
        }
    }

    /// Add a dependency type over the section's own instructions
    pub fn register_dependency(&mut self, dependency_type: Box<dyn DependencyType>) {
        self.deps.register_dependency(dependency_type);
    }

    /// Current structure with its situations, before dependencies are applied
    pub fn template(&self) -> &Program {
        &self.template
    }

    /// Settle on the first feasible structure at or after the current one
    fn settle_structure(&mut self) {
        while self.iterator.has_value() {
            let mut template = self.iterator.value();
            let constructed = {
                let mut context = self.context.borrow_mut();
                self.iterator
                    .construct(self.processor.as_ref(), &mut context, &mut template)
            };

            if constructed {
                self.template = template;
                if self.rebuild() {
                    self.has_value = true;
                    return;
                }
                tracing::debug!(
                    instructions = self.template.len(),
                    "structure has no situation or dependency assignment, skipped"
                );
            } else {
                tracing::debug!("structure rejected by construct, skipped");
            }
            self.iterator.next();
        }
        self.has_value = false;
    }

    fn rebuild(&mut self) -> bool {
        self.situations.init(&mut self.template);
        self.deps.process(&self.template);
        self.deps.init_register();
        self.deps.init_content();
        self.situations.has_value() && self.deps.has_register_value() && self.deps.has_content_value()
    }
}

impl Enumerator for Section {
    type Item = Program;

    fn init(&mut self) {
        self.iterator.init();
        self.settle_structure();
    }

    fn has_value(&self) -> bool {
        self.has_value
    }

    fn value(&self) -> Program {
        assert!(self.has_value, "value() on exhausted section");
        let mut program = self.template.clone();
        self.deps.apply(&mut program);
        program
    }

    fn next(&mut self) {
        assert!(self.has_value, "next() on exhausted section");

        self.deps.next_content();
        if self.deps.has_content_value() {
            return;
        }
        self.deps.init_content();

        self.situations.next(&mut self.template);
        if self.situations.has_value() {
            return;
        }
        self.situations.init(&mut self.template);

        self.deps.next_register();
        if self.deps.has_register_value() {
            return;
        }
        self.deps.init_register();

        self.iterator.next();
        self.settle_structure();
    }

    fn stop(&mut self) {
        self.has_value = false;
    }

    fn clone_box(&self) -> BoxedEnumerator<Program> {
        Box::new(self.clone())
    }
}
