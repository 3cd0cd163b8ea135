//! Processor and generator context collaborators
//!
//! The processor model is opaque to the core: it is only passed through to
//! structural enumerators and situations. The generator context keeps the
//! bookkeeping that has to be shared between the sections of one run
//! (currently branch labels).

use rustc_hash::FxHashMap;
use std::fmt;

/// Processor model (built by external translators)
pub trait Processor: fmt::Debug {
    fn name(&self) -> &str;
}

/// Processor model with nothing but a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedProcessor {
    name: String,
}

impl NamedProcessor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Processor for NamedProcessor {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Shared generation state
#[derive(Debug, Clone)]
pub struct GeneratorContext {
    label_prefix: String,
    labels: FxHashMap<usize, String>,
    next_label: usize,
}

impl Default for GeneratorContext {
    fn default() -> Self {
        Self::new("L")
    }
}

impl GeneratorContext {
    pub fn new(label_prefix: impl Into<String>) -> Self {
        Self {
            label_prefix: label_prefix.into(),
            labels: FxHashMap::default(),
            next_label: 0,
        }
    }

    /// Label for a template position
    ///
    /// Stable until `reset()`. Labels handed out after a reset never collide
    /// with earlier ones.
    pub fn label(&mut self, position: usize) -> String {
        if let Some(label) = self.labels.get(&position) {
            return label.clone();
        }
        let label = format!("{}{}", self.label_prefix, self.next_label);
        self.next_label += 1;
        self.labels.insert(position, label.clone());
        label
    }

    /// Forget per-template state
    pub fn reset(&mut self) {
        self.labels.clear();
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_stable_until_reset() {
        let mut context = GeneratorContext::default();
        let a = context.label(3);
        assert_eq!(context.label(3), a);
        assert_ne!(context.label(4), a);

        context.reset();
        assert_eq!(context.label_count(), 0);
        let b = context.label(3);
        assert_ne!(a, b);
    }
}
