//! Iteration primitives
//!
//! The lazy enumeration protocol and the combinatorial building blocks every
//! other slice composes: integer ranges, booleans, ordered samples and
//! Cartesian products.

mod boolean;
mod product;
mod protocol;
mod range;
mod sample;

pub use boolean::{BooleanIterator, SingleValueIterator};
pub use product::ProductIterator;
pub use protocol::{collect_values, BoxedEnumerator, Enumerator};
pub use range::RangeIterator;
pub use sample::SampleIterator;
