//! Lazy enumeration protocol
//!
//! Single-cursor, restartable enumeration shared by every iterator in the
//! crate. The trait is deliberately not `std::iter::Iterator`: the cursor is
//! read (`value`) and advanced (`next`) separately, so composite iterators
//! can hold a child on the same element while inner axes cycle.
//!
//! # Contract
//! - `init()` positions on the first admissible element, or exhausts
//! - `value()` and `next()` require `has_value()`; violating that panics
//! - `stop()` forces exhaustion
//! - `clone_box()` yields an independent cursor at the same position

/// Lazy enumeration cursor
pub trait Enumerator {
    type Item;

    /// Reset to the first element (or exhaust if there is none)
    fn init(&mut self);

    /// Whether the cursor points at an element
    fn has_value(&self) -> bool;

    /// Current element
    ///
    /// # Panics
    /// When called on an exhausted cursor.
    fn value(&self) -> Self::Item;

    /// Advance to the next element, possibly exhausting the cursor
    ///
    /// # Panics
    /// When called on an exhausted cursor.
    fn next(&mut self);

    /// Force exhaustion
    fn stop(&mut self);

    /// Independent copy of the cursor
    fn clone_box(&self) -> BoxedEnumerator<Self::Item>;
}

/// Boxed cursor, used by composite iterators
pub type BoxedEnumerator<T> = Box<dyn Enumerator<Item = T>>;

impl<T: 'static> Clone for BoxedEnumerator<T> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Drain a cursor from its current position into a vector
///
/// Test and debugging helper; callers must make sure the enumeration is
/// finite.
pub fn collect_values<E>(enumerator: &mut E) -> Vec<E::Item>
where
    E: Enumerator + ?Sized,
{
    let mut values = Vec::new();
    while enumerator.has_value() {
        values.push(enumerator.value());
        enumerator.next();
    }
    values
}
