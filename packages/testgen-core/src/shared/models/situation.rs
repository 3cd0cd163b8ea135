//! Situation seam
//!
//! A situation is an external per-instruction constraint object. The core
//! never opens it beyond the iterator contract: situations of a realized
//! instruction sequence form one of the axes a `Section` enumerates.

use std::any::Any;
use std::fmt;

/// Test situation attached to an instruction
pub trait Situation: fmt::Debug {
    /// Situation name (used in listings and logs)
    fn name(&self) -> &str;

    /// Reset to the first variant
    fn init(&mut self);

    /// Whether a current variant exists
    fn has_value(&self) -> bool;

    /// Advance to the next variant
    fn next(&mut self);

    /// Force exhaustion
    fn stop(&mut self);

    /// Independent copy
    fn clone_box(&self) -> Box<dyn Situation>;

    /// Concrete situation, for features that attach their own kinds
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl Clone for Box<dyn Situation> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Situation with a fixed number of anonymous variants
///
/// Stands in for solver-backed situations wherever only the variant count
/// matters to the enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSituation {
    name: String,
    variants: usize,
    current: usize,
    has_value: bool,
}

impl VariantSituation {
    pub fn new(name: impl Into<String>, variants: usize) -> Self {
        Self {
            name: name.into(),
            variants,
            current: 0,
            has_value: variants > 0,
        }
    }

    /// Index of the current variant
    pub fn variant(&self) -> usize {
        self.current
    }

    pub fn variants(&self) -> usize {
        self.variants
    }
}

impl Situation for VariantSituation {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self) {
        self.current = 0;
        self.has_value = self.variants > 0;
    }

    fn has_value(&self) -> bool {
        self.has_value
    }

    fn next(&mut self) {
        assert!(self.has_value, "next() on exhausted situation '{}'", self.name);
        self.current += 1;
        if self.current >= self.variants {
            self.has_value = false;
        }
    }

    fn stop(&mut self) {
        self.has_value = false;
    }

    fn clone_box(&self) -> Box<dyn Situation> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_situation_cycles_once() {
        let mut situation = VariantSituation::new("overflow", 3);
        situation.init();

        let mut seen = Vec::new();
        while situation.has_value() {
            seen.push(situation.variant());
            situation.next();
        }
        assert_eq!(seen, vec![0, 1, 2]);

        situation.init();
        assert!(situation.has_value());
        assert_eq!(situation.variant(), 0);
    }

    #[test]
    fn test_boxed_clone_is_independent() {
        let mut original: Box<dyn Situation> = Box::new(VariantSituation::new("s", 2));
        original.init();
        let copy = original.clone();
        original.next();
        original.next();
        assert!(!original.has_value());
        assert!(copy.has_value());
        assert!(copy.as_any().is::<VariantSituation>());
    }
}
