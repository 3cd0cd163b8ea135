//! Structural enumerators

mod product_template_iterator;
mod sequence_template_iterator;

pub use product_template_iterator::ProductTemplateIterator;
pub use sequence_template_iterator::SequenceTemplateIterator;
