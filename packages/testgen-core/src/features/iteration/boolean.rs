//! Boolean and single-value iterators

use super::protocol::{BoxedEnumerator, Enumerator};

/// Iterates `false`, then `true`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BooleanIterator {
    value: bool,
    has_value: bool,
}

impl BooleanIterator {
    pub fn new() -> Self {
        Self {
            value: false,
            has_value: true,
        }
    }
}

impl Enumerator for BooleanIterator {
    type Item = bool;

    fn init(&mut self) {
        self.value = false;
        self.has_value = true;
    }

    fn has_value(&self) -> bool {
        self.has_value
    }

    fn value(&self) -> bool {
        assert!(self.has_value, "value() on exhausted boolean iterator");
        self.value
    }

    fn next(&mut self) {
        assert!(self.has_value, "next() on exhausted boolean iterator");
        if self.value {
            self.has_value = false;
        } else {
            self.value = true;
        }
    }

    fn stop(&mut self) {
        self.has_value = false;
    }

    fn clone_box(&self) -> BoxedEnumerator<bool> {
        Box::new(*self)
    }
}

/// Yields exactly one value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleValueIterator<T> {
    value: T,
    has_value: bool,
}

impl<T: Clone> SingleValueIterator<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            has_value: true,
        }
    }
}

impl<T: Clone + 'static> Enumerator for SingleValueIterator<T> {
    type Item = T;

    fn init(&mut self) {
        self.has_value = true;
    }

    fn has_value(&self) -> bool {
        self.has_value
    }

    fn value(&self) -> T {
        assert!(self.has_value, "value() on exhausted single-value iterator");
        self.value.clone()
    }

    fn next(&mut self) {
        assert!(self.has_value, "next() on exhausted single-value iterator");
        self.has_value = false;
    }

    fn stop(&mut self) {
        self.has_value = false;
    }

    fn clone_box(&self) -> BoxedEnumerator<T> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::iteration::collect_values;

    #[test]
    fn test_boolean_order() {
        let mut it = BooleanIterator::new();
        it.init();
        assert_eq!(collect_values(&mut it), vec![false, true]);
    }

    #[test]
    fn test_single_value() {
        let mut it = SingleValueIterator::new("x");
        assert_eq!(collect_values(&mut it), vec!["x"]);
        it.init();
        assert!(it.has_value());
    }
}
