//! Register dependency
//!
//! A register dependency makes the dependent operand name the same register
//! as the determinant. Each instance is either inactive or active; fixed
//! instances are active in their only state.
//!
//! Consistency per operand:
//! - **Irredundancy** (seen from the dependent): an active instance may not
//!   chain through a determinant that itself depends on something, and an
//!   operand takes its register from at most one determinant.
//! - **Redefinition** (seen from the determinant): when an active instance
//!   redefines the register, a later active use of the same register must
//!   expect compatible content.

use crate::features::dependency::domain::ConsistencyView;
use crate::features::dependency::ports::{Dependency, DependencyType};
use crate::features::iteration::{BooleanIterator, Enumerator, SingleValueIterator};
use crate::shared::models::{Operand, OperandId, Program};

pub const REGISTER_DEPENDENCY: &str = "register";

/// Register dependency type
#[derive(Debug, Clone, Default)]
pub struct RegisterDependencyType {
    content_type: Option<String>,
    fixed: bool,
}

impl RegisterDependencyType {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: only relate registers of this content type
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Builder: every instance is always active
    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }
}

impl DependencyType for RegisterDependencyType {
    fn name(&self) -> &str {
        REGISTER_DEPENDENCY
    }

    fn is_register(&self) -> bool {
        true
    }

    fn is_applicable_to(&self, dependent: &Operand, determinant: &Operand) -> bool {
        if !dependent.is_register() || !determinant.is_register() {
            return false;
        }
        if !dependent.is_content_compatible(determinant) {
            return false;
        }
        match &self.content_type {
            Some(content_type) => &dependent.content_type == content_type,
            None => true,
        }
    }

    fn create_dependency(&self, dependent: OperandId, determinant: OperandId) -> Box<dyn Dependency> {
        Box::new(RegisterDependency::new(dependent, determinant, self.fixed))
    }

    fn clone_box(&self) -> Box<dyn DependencyType> {
        Box::new(self.clone())
    }
}

#[derive(Debug, Clone)]
enum Activity {
    Free(BooleanIterator),
    Fixed(SingleValueIterator<bool>),
}

impl Activity {
    fn cursor(&self) -> &dyn Enumerator<Item = bool> {
        match self {
            Activity::Free(cursor) => cursor,
            Activity::Fixed(cursor) => cursor,
        }
    }

    fn cursor_mut(&mut self) -> &mut dyn Enumerator<Item = bool> {
        match self {
            Activity::Free(cursor) => cursor,
            Activity::Fixed(cursor) => cursor,
        }
    }
}

/// Register dependency instance
#[derive(Debug, Clone)]
pub struct RegisterDependency {
    dependent: OperandId,
    determinant: OperandId,
    activity: Activity,
}

impl RegisterDependency {
    pub fn new(dependent: OperandId, determinant: OperandId, fixed: bool) -> Self {
        let activity = if fixed {
            Activity::Fixed(SingleValueIterator::new(true))
        } else {
            Activity::Free(BooleanIterator::new())
        };
        Self {
            dependent,
            determinant,
            activity,
        }
    }

    fn is_irredundant(&self, view: &ConsistencyView<'_>) -> bool {
        let chained = view
            .forward(self.determinant)
            .any(|other| other.is_active());
        let duplicated = view
            .forward(self.dependent)
            .any(|other| other.is_active() && other.determinant() != self.determinant);
        !chained && !duplicated
    }

    fn is_redefinition_consistent(&self, view: &ConsistencyView<'_>) -> bool {
        let Some(redefined) = view.operand(self.dependent) else {
            return true;
        };
        if !redefined.is_output() {
            return true;
        }
        view.backward(self.determinant)
            .filter(|other| other.is_active())
            .filter(|other| other.dependent().instruction > self.dependent.instruction)
            .filter_map(|other| view.operand(other.dependent()))
            .filter(|used| used.is_input())
            .all(|used| redefined.is_content_compatible(used))
    }
}

impl Dependency for RegisterDependency {
    fn kind(&self) -> &str {
        REGISTER_DEPENDENCY
    }

    fn dependent(&self) -> OperandId {
        self.dependent
    }

    fn determinant(&self) -> OperandId {
        self.determinant
    }

    fn init(&mut self) {
        self.activity.cursor_mut().init();
    }

    fn has_value(&self) -> bool {
        self.activity.cursor().has_value()
    }

    fn next(&mut self) {
        self.activity.cursor_mut().next();
    }

    fn stop(&mut self) {
        self.activity.cursor_mut().stop();
    }

    fn is_active(&self) -> bool {
        let cursor = self.activity.cursor();
        cursor.has_value() && cursor.value()
    }

    fn is_fixed(&self) -> bool {
        matches!(self.activity, Activity::Fixed(_))
    }

    fn is_consistent(&self, operand: OperandId, view: &ConsistencyView<'_>) -> bool {
        if !self.is_active() {
            return true;
        }
        if operand == self.dependent && !self.is_fixed() && !self.is_irredundant(view) {
            return false;
        }
        if operand == self.determinant && !self.is_redefinition_consistent(view) {
            return false;
        }
        true
    }

    fn apply(&self, program: &mut Program) {
        let register = program.operand(self.determinant).and_then(|o| o.value);
        if let Some(operand) = program.operand_mut(self.dependent) {
            operand.value = register;
        }
    }

    fn clone_box(&self) -> Box<dyn Dependency> {
        Box::new(self.clone())
    }
}
