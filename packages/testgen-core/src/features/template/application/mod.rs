//! Section and template composition

mod section;
mod situation_iterator;
mod template;

pub use section::Section;
pub use situation_iterator::SituationIterator;
pub use template::Template;
