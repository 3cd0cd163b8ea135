//! Dependency ports
//!
//! A dependency *type* decides which operand pairs it relates and produces
//! one *instance* per qualifying pair. Each instance owns its own cursor
//! over the ways the relation can hold (e.g. inactive/active) and judges
//! consistency per operand, given read access to every other instance of
//! the same iterator.

use crate::features::dependency::domain::ConsistencyView;
use crate::shared::models::{Operand, OperandId, Program};
use std::fmt;

/// Relation kind plus instance factory
pub trait DependencyType: fmt::Debug {
    /// Kind name shared by every instance of this type
    fn name(&self) -> &str;

    /// Register dependencies form their own axis in sections and templates
    fn is_register(&self) -> bool;

    /// Whether `dependent` may depend on `determinant`
    fn is_applicable_to(&self, dependent: &Operand, determinant: &Operand) -> bool;

    /// Instance between two operands of the processed program
    fn create_dependency(
        &self,
        dependent: OperandId,
        determinant: OperandId,
    ) -> Box<dyn Dependency>;

    fn clone_box(&self) -> Box<dyn DependencyType>;
}

impl Clone for Box<dyn DependencyType> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Dependency instance between two operands
pub trait Dependency: fmt::Debug {
    fn kind(&self) -> &str;

    /// Operand that takes its value from the determinant
    fn dependent(&self) -> OperandId;

    /// Operand that determines the dependent
    fn determinant(&self) -> OperandId;

    fn init(&mut self);

    fn has_value(&self) -> bool;

    fn next(&mut self);

    fn stop(&mut self);

    /// Whether the instance may be advanced in the current state
    fn precondition(&self) -> bool {
        true
    }

    /// Whether the relation holds in the current state
    fn is_active(&self) -> bool;

    /// Fixed instances are active in every state
    fn is_fixed(&self) -> bool {
        false
    }

    /// Consistency of the current state as seen from `operand`
    fn is_consistent(&self, operand: OperandId, view: &ConsistencyView<'_>) -> bool;

    /// Realize the current state on a program
    fn apply(&self, program: &mut Program);

    fn clone_box(&self) -> Box<dyn Dependency>;
}

impl Clone for Box<dyn Dependency> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
