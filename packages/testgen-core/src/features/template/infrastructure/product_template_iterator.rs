//! Product template iterator
//!
//! Fixed-size templates built as the Cartesian product of instruction
//! equivalence classes. Inside a class, instructions are picked round-robin:
//! every use of a class advances its offset, so consecutive templates walk
//! through all members.
//!
//! Once the class product wraps around, enumeration restarts only while some
//! class still has members that were never emitted, and then only templates
//! that reach such a member are kept.

use crate::errors::{GeneratorError, Result};
use crate::features::iteration::{BoxedEnumerator, Enumerator};
use crate::features::template::domain::InstructionClasses;
use crate::features::template::ports::TemplateIterator;
use crate::shared::models::{GeneratorContext, Processor, Program};

#[derive(Debug, Clone)]
pub struct ProductTemplateIterator {
    classes: InstructionClasses,
    /// Class per template position
    template: Vec<usize>,
    /// Round-robin offset per class
    offsets: Vec<usize>,
    uncovered: bool,
    has_value: bool,
}

impl ProductTemplateIterator {
    /// # Errors
    /// `Template` if `size` is zero or some class has no instruction.
    pub fn new(size: usize, classes: InstructionClasses) -> Result<Self> {
        if size == 0 {
            return Err(GeneratorError::template("template size should be positive"));
        }
        if let Some(empty) = classes.iter().find(|c| c.is_empty()) {
            return Err(GeneratorError::template(format!(
                "equivalence class '{}' has no instructions",
                empty.name()
            )));
        }
        Ok(Self {
            template: vec![0; size],
            offsets: vec![0; classes.len()],
            classes,
            uncovered: false,
            has_value: false,
        })
    }

    pub fn template_size(&self) -> usize {
        self.template.len()
    }

    /// Odometer step over the class product; `false` when it wrapped
    fn advance_template(&mut self) -> bool {
        let count = self.classes.len();
        for position in self.template.iter_mut().rev() {
            if *position + 1 < count {
                *position += 1;
                return true;
            }
            *position = 0;
        }
        false
    }

    fn covers_new_instructions(&self) -> bool {
        self.template
            .iter()
            .any(|&c| self.offsets[c] < self.classes.class(c).len())
    }
}

impl Enumerator for ProductTemplateIterator {
    type Item = Program;

    fn init(&mut self) {
        self.template.iter_mut().for_each(|c| *c = 0);
        self.offsets.iter_mut().for_each(|o| *o = 0);
        self.uncovered = false;
        self.has_value = !self.classes.is_empty();
    }

    fn has_value(&self) -> bool {
        self.has_value
    }

    fn value(&self) -> Program {
        assert!(self.has_value, "value() on exhausted product template iterator");
        let mut used = vec![0; self.classes.len()];
        self.template
            .iter()
            .map(|&c| {
                let class = self.classes.class(c);
                let slot = (self.offsets[c] + used[c]) % class.len();
                used[c] += 1;
                class.instructions()[slot].clone()
            })
            .collect()
    }

    fn next(&mut self) {
        assert!(self.has_value, "next() on exhausted product template iterator");
        for &c in &self.template {
            self.offsets[c] += 1;
        }

        loop {
            if !self.advance_template() {
                self.uncovered = self
                    .offsets
                    .iter()
                    .enumerate()
                    .any(|(c, &offset)| offset < self.classes.class(c).len());
                if !self.uncovered {
                    self.has_value = false;
                }
                return;
            }
            if !self.uncovered || self.covers_new_instructions() {
                return;
            }
            trace_step!(template = ?self.template, "template covers nothing new");
        }
    }

    fn stop(&mut self) {
        self.has_value = false;
    }

    fn clone_box(&self) -> BoxedEnumerator<Program> {
        Box::new(self.clone())
    }
}

impl TemplateIterator for ProductTemplateIterator {
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
