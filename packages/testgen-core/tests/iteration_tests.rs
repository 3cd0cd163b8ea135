//! Counting properties of the iteration primitives

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use testgen_core::features::iteration::collect_values;
use testgen_core::{BoxedEnumerator, Enumerator, ProductIterator, RangeIterator, SampleIterator};

fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

#[quickcheck]
fn qc_range_counts_inclusive_bounds(min: u8, max: u8) -> bool {
    let (min, max) = (min as usize, max as usize);
    let mut range = RangeIterator::new(min, max);
    let values = collect_values(&mut range);

    let expected = if min > max { 0 } else { max - min + 1 };
    values.len() == expected && values.windows(2).all(|w| w[1] == w[0] + 1)
}

#[quickcheck]
fn qc_sample_enumerates_each_subset_once(n: u8, k: u8) -> TestResult {
    let (n, k) = ((n % 9) as usize, (k % 5) as usize);
    if n == 0 {
        return TestResult::discard();
    }
    let mut sample = SampleIterator::new(0, n - 1, k);
    let values = collect_values(&mut sample);

    let increasing = values
        .iter()
        .all(|v| v.len() == k && v.windows(2).all(|w| w[0] < w[1]));
    let lexicographic = values.windows(2).all(|w| w[0] < w[1]);
    TestResult::from_bool(values.len() == binomial(n, k) && increasing && lexicographic)
}

#[quickcheck]
fn qc_product_size_is_product_of_sizes(sizes: Vec<u8>) -> TestResult {
    if sizes.len() > 4 {
        return TestResult::discard();
    }
    let sizes: Vec<usize> = sizes.iter().map(|&s| (s % 4) as usize).collect();
    let iterators: Vec<BoxedEnumerator<usize>> = sizes
        .iter()
        .map(|&s| Box::new(RangeIterator::indices(s)) as BoxedEnumerator<usize>)
        .collect();

    let mut product = ProductIterator::with_iterators(iterators);
    let values = collect_values(&mut product);
    TestResult::from_bool(values.len() == sizes.iter().product::<usize>())
}

#[quickcheck]
fn qc_init_restarts_enumeration(min: u8, span: u8) -> bool {
    let mut range = RangeIterator::new(min as usize, min as usize + (span % 16) as usize);
    let first = collect_values(&mut range);
    range.init();
    collect_values(&mut range) == first
}

#[test]
fn cloned_cursor_is_independent() {
    let mut product = ProductIterator::with_iterators(vec![
        Box::new(RangeIterator::indices(2)) as BoxedEnumerator<usize>,
        Box::new(RangeIterator::indices(3)),
    ]);
    product.next();
    let mut copy = product.clone_box();

    copy.next();
    assert_eq!(product.value(), vec![0, 1]);
    assert_eq!(copy.value(), vec![0, 2]);
}
