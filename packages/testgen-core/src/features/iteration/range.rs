//! Integer range iterator

use super::protocol::{BoxedEnumerator, Enumerator};

/// Iterates `min..=max` with a positive step; empty when `min > max`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeIterator {
    min: usize,
    max: usize,
    step: usize,
    current: usize,
    has_value: bool,
}

impl RangeIterator {
    pub fn new(min: usize, max: usize) -> Self {
        Self::with_step(min, max, 1)
    }

    /// # Panics
    /// When `step` is zero.
    pub fn with_step(min: usize, max: usize, step: usize) -> Self {
        assert!(step > 0, "range step must be positive");
        let mut range = Self {
            min,
            max,
            step,
            current: min,
            has_value: false,
        };
        range.init();
        range
    }

    /// `0..count` (empty when `count == 0`)
    pub fn indices(count: usize) -> Self {
        if count == 0 {
            Self::new(1, 0)
        } else {
            Self::new(0, count - 1)
        }
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }
}

impl Enumerator for RangeIterator {
    type Item = usize;

    fn init(&mut self) {
        self.current = self.min;
        self.has_value = self.min <= self.max;
    }

    fn has_value(&self) -> bool {
        self.has_value
    }

    fn value(&self) -> usize {
        assert!(self.has_value, "value() on exhausted range");
        self.current
    }

    fn next(&mut self) {
        assert!(self.has_value, "next() on exhausted range");
        match self.current.checked_add(self.step) {
            Some(next) if next <= self.max => self.current = next,
            _ => self.has_value = false,
        }
    }

    fn stop(&mut self) {
        self.has_value = false;
    }

    fn clone_box(&self) -> BoxedEnumerator<usize> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::iteration::collect_values;

    #[test]
    fn test_inclusive_bounds() {
        let mut range = RangeIterator::new(2, 5);
        assert_eq!(collect_values(&mut range), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_step() {
        let mut range = RangeIterator::with_step(0, 7, 3);
        assert_eq!(collect_values(&mut range), vec![0, 3, 6]);
    }

    #[test]
    fn test_empty_ranges() {
        assert!(!RangeIterator::new(3, 2).has_value());
        let mut empty = RangeIterator::indices(0);
        empty.init();
        assert!(!empty.has_value());
        assert_eq!(collect_values(&mut RangeIterator::indices(2)), vec![0, 1]);
    }

    #[test]
    fn test_max_does_not_overflow() {
        let mut range = RangeIterator::new(usize::MAX - 1, usize::MAX);
        assert_eq!(collect_values(&mut range).len(), 2);
    }

    #[test]
    #[should_panic(expected = "exhausted")]
    fn test_value_after_exhaustion_panics() {
        let mut range = RangeIterator::new(0, 0);
        range.next();
        range.value();
    }
}
