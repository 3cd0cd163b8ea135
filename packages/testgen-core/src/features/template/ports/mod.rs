//! Structural enumerator seam
//!
//! A template iterator enumerates instruction skeletons. `construct` gives it
//! a chance to finish a skeleton once its situations are attached (labels,
//! inserted steps); returning `false` marks the skeleton infeasible and the
//! section moves on to the next one.

use crate::features::iteration::Enumerator;
use crate::shared::models::{GeneratorContext, Processor, Program};

pub trait TemplateIterator: Enumerator<Item = Program> {
    /// Complete `template` in place
    fn construct(
        &mut self,
        processor: &dyn Processor,
        context: &mut GeneratorContext,
        template: &mut Program,
    ) -> bool;

    fn clone_template(&self) -> Box<dyn TemplateIterator>;
}

impl Clone for Box<dyn TemplateIterator> {
    fn clone(&self) -> Self {
        self.clone_template()
    }
}
