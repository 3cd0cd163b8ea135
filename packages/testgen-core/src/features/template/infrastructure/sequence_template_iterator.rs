//! Single fixed program

use crate::features::iteration::{BoxedEnumerator, Enumerator};
use crate::features::template::ports::TemplateIterator;
use crate::shared::models::{GeneratorContext, Processor, Program};

/// Yields one fixed program; `construct` accepts it unchanged
#[derive(Debug, Clone)]
pub struct SequenceTemplateIterator {
    program: Program,
    has_value: bool,
}

impl SequenceTemplateIterator {
    pub fn new(program: Program) -> Self {
        Self {
            program,
            has_value: false,
        }
    }
}

impl Enumerator for SequenceTemplateIterator {
    type Item = Program;

    fn init(&mut self) {
        self.has_value = true;
    }

    fn has_value(&self) -> bool {
        self.has_value
    }

    fn value(&self) -> Program {
        assert!(self.has_value, "value() on exhausted sequence iterator");
        self.program.clone()
    }

    fn next(&mut self) {
        assert!(self.has_value, "next() on exhausted sequence iterator");
        self.has_value = false;
    }

    fn stop(&mut self) {
        self.has_value = false;
    }

    fn clone_box(&self) -> BoxedEnumerator<Program> {
        Box::new(self.clone())
    }
}

impl TemplateIterator for SequenceTemplateIterator {
    fn construct(
        &mut self,
        _processor: &dyn Processor,
        _context: &mut GeneratorContext,
        _template: &mut Program,
    ) -> bool {
        true
    }

    fn clone_template(&self) -> Box<dyn TemplateIterator> {
        Box::new(self.clone())
    }
}
