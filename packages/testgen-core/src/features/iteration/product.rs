//! Cartesian product iterator
//!
//! Odometer over independent axes: the last registered iterator is the
//! innermost digit. A product of zero iterators has exactly one (empty)
//! value, so an axis that happens to have no digits never blocks the axes
//! around it.

use super::protocol::{BoxedEnumerator, Enumerator};

/// Product of boxed child iterators
pub struct ProductIterator<T> {
    iterators: Vec<BoxedEnumerator<T>>,
    has_value: bool,
}

impl<T: 'static> ProductIterator<T> {
    pub fn new() -> Self {
        Self {
            iterators: Vec::new(),
            has_value: false,
        }
    }

    pub fn with_iterators(iterators: Vec<BoxedEnumerator<T>>) -> Self {
        let mut product = Self {
            iterators,
            has_value: false,
        };
        product.init();
        product
    }

    /// Append an axis (call `init()` afterwards)
    pub fn register_iterator(&mut self, iterator: BoxedEnumerator<T>) {
        self.iterators.push(iterator);
    }

    pub fn len(&self) -> usize {
        self.iterators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.iterators.is_empty()
    }

    /// Current value of the `index`-th axis
    pub fn value_at(&self, index: usize) -> T {
        assert!(self.has_value, "value_at() on exhausted product");
        self.iterators[index].value()
    }

    pub fn iterator(&self, index: usize) -> &dyn Enumerator<Item = T> {
        self.iterators[index].as_ref()
    }
}

impl<T: 'static> Default for ProductIterator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Clone for ProductIterator<T> {
    fn clone(&self) -> Self {
        Self {
            iterators: self.iterators.clone(),
            has_value: self.has_value,
        }
    }
}

impl<T: 'static> Enumerator for ProductIterator<T> {
    type Item = Vec<T>;

    fn init(&mut self) {
        self.has_value = true;
        for iterator in &mut self.iterators {
            iterator.init();
            if !iterator.has_value() {
                self.has_value = false;
            }
        }
    }

    fn has_value(&self) -> bool {
        self.has_value
    }

    fn value(&self) -> Vec<T> {
        assert!(self.has_value, "value() on exhausted product");
        self.iterators.iter().map(|i| i.value()).collect()
    }

    fn next(&mut self) {
        assert!(self.has_value, "next() on exhausted product");
        for iterator in self.iterators.iter_mut().rev() {
            iterator.next();
            if iterator.has_value() {
                return;
            }
            iterator.init();
        }
        self.has_value = false;
    }

    fn stop(&mut self) {
        self.has_value = false;
    }

    fn clone_box(&self) -> BoxedEnumerator<Vec<T>> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::iteration::{collect_values, BooleanIterator, RangeIterator};

    #[test]
    fn test_last_axis_is_innermost() {
        let mut product = ProductIterator::with_iterators(vec![
            Box::new(RangeIterator::new(0, 1)) as BoxedEnumerator<usize>,
            Box::new(RangeIterator::new(5, 6)),
        ]);
        assert_eq!(
            collect_values(&mut product),
            vec![vec![0, 5], vec![0, 6], vec![1, 5], vec![1, 6]]
        );
    }

    #[test]
    fn test_empty_product_has_one_value() {
        let mut product: ProductIterator<usize> = ProductIterator::new();
        product.init();
        assert_eq!(collect_values(&mut product), vec![Vec::<usize>::new()]);
    }

    #[test]
    fn test_empty_axis_empties_product() {
        let mut product = ProductIterator::with_iterators(vec![
            Box::new(RangeIterator::new(0, 3)) as BoxedEnumerator<usize>,
            Box::new(RangeIterator::indices(0)),
        ]);
        product.init();
        assert!(!product.has_value());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut product = ProductIterator::with_iterators(vec![
            Box::new(BooleanIterator::new()) as BoxedEnumerator<bool>,
            Box::new(BooleanIterator::new()),
        ]);
        let snapshot = product.clone();
        product.next();
        product.next();
        assert_eq!(product.value(), vec![true, false]);
        assert_eq!(snapshot.value(), vec![false, false]);
    }
}
