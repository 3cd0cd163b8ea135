//! Ordered sample (k-combination) iterator
//!
//! # Algorithm
//! Lexicographic successor: find the rightmost position that can still grow
//! without running past `max`, bump it, and pack every later position right
//! behind it.
//!
//! # Time Complexity
//! O(k) per `next()`, C(n, k) values in total.

use super::protocol::{BoxedEnumerator, Enumerator};

/// Iterates the k-element ordered subsets of `min..=max`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleIterator {
    min: usize,
    max: usize,
    size: usize,
    indices: Vec<usize>,
    has_value: bool,
}

impl SampleIterator {
    pub fn new(min: usize, max: usize, size: usize) -> Self {
        let mut sample = Self {
            min,
            max,
            size,
            indices: Vec::with_capacity(size),
            has_value: false,
        };
        sample.init();
        sample
    }

    fn population(&self) -> usize {
        if self.min > self.max {
            0
        } else {
            self.max - self.min + 1
        }
    }

    /// Current subset without cloning
    pub fn indices(&self) -> &[usize] {
        assert!(self.has_value, "indices() on exhausted sample iterator");
        &self.indices
    }
}

impl Enumerator for SampleIterator {
    type Item = Vec<usize>;

    fn init(&mut self) {
        self.indices.clear();
        self.has_value = self.size <= self.population();
        if self.has_value {
            self.indices.extend((0..self.size).map(|i| self.min + i));
        }
    }

    fn has_value(&self) -> bool {
        self.has_value
    }

    fn value(&self) -> Vec<usize> {
        self.indices().to_vec()
    }

    fn next(&mut self) {
        assert!(self.has_value, "next() on exhausted sample iterator");
        let k = self.size;
        let grow = (0..k).rev().find(|&i| self.indices[i] < self.max - (k - 1 - i));
        match grow {
            Some(i) => {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
            }
            None => self.has_value = false,
        }
    }

    fn stop(&mut self) {
        self.has_value = false;
    }

    fn clone_box(&self) -> BoxedEnumerator<Vec<usize>> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::iteration::collect_values;

    #[test]
    fn test_combinations_in_order() {
        let mut sample = SampleIterator::new(0, 3, 2);
        assert_eq!(
            collect_values(&mut sample),
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
    }

    #[test]
    fn test_offset_range() {
        let mut sample = SampleIterator::new(5, 7, 3);
        assert_eq!(collect_values(&mut sample), vec![vec![5, 6, 7]]);
    }

    #[test]
    fn test_degenerate_sizes() {
        let mut empty_subset = SampleIterator::new(0, 2, 0);
        assert_eq!(collect_values(&mut empty_subset), vec![Vec::<usize>::new()]);

        let too_large = SampleIterator::new(0, 1, 3);
        assert!(!too_large.has_value());
    }
}
