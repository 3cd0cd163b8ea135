//! Branch template adapters

mod branch_template_iterator;
mod counter_situation;

pub use branch_template_iterator::BranchTemplateIterator;
pub use counter_situation::CounterBranchSituation;
