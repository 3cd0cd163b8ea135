//! Content dependency
//!
//! Non-register operands (immediates, addresses) of the same kind and content
//! type share their value. Instances are independent of each other, so every
//! state is consistent.

use crate::features::dependency::domain::ConsistencyView;
use crate::features::dependency::ports::{Dependency, DependencyType};
use crate::features::iteration::{BooleanIterator, Enumerator};
use crate::shared::models::{Operand, OperandId, Program};

pub const CONTENT_DEPENDENCY: &str = "content";

#[derive(Debug, Clone, Default)]
pub struct ContentDependencyType;

impl ContentDependencyType {
    pub fn new() -> Self {
        Self
    }
}

impl DependencyType for ContentDependencyType {
    fn name(&self) -> &str {
        CONTENT_DEPENDENCY
    }

    fn is_register(&self) -> bool {
        false
    }

    fn is_applicable_to(&self, dependent: &Operand, determinant: &Operand) -> bool {
        !dependent.is_register()
            && dependent.kind == determinant.kind
            && dependent.is_content_compatible(determinant)
    }

    fn create_dependency(&self, dependent: OperandId, determinant: OperandId) -> Box<dyn Dependency> {
        Box::new(ContentDependency {
            dependent,
            determinant,
            cursor: BooleanIterator::new(),
        })
    }

    fn clone_box(&self) -> Box<dyn DependencyType> {
        Box::new(self.clone())
    }
}

#[derive(Debug, Clone)]
pub struct ContentDependency {
    dependent: OperandId,
    determinant: OperandId,
    cursor: BooleanIterator,
}

impl Dependency for ContentDependency {
    fn kind(&self) -> &str {
        CONTENT_DEPENDENCY
    }

    fn dependent(&self) -> OperandId {
        self.dependent
    }

    fn determinant(&self) -> OperandId {
        self.determinant
    }

    fn init(&mut self) {
        self.cursor.init();
    }

    fn has_value(&self) -> bool {
        self.cursor.has_value()
    }

    fn next(&mut self) {
        self.cursor.next();
    }

    fn stop(&mut self) {
        self.cursor.stop();
    }

    fn is_active(&self) -> bool {
        self.cursor.has_value() && self.cursor.value()
    }

    fn is_consistent(&self, _operand: OperandId, _view: &ConsistencyView<'_>) -> bool {
        true
    }

    fn apply(&self, program: &mut Program) {
        let value = program.operand(self.determinant).and_then(|o| o.value);
        if let Some(operand) = program.operand_mut(self.dependent) {
            operand.value = value;
        }
    }

    fn clone_box(&self) -> Box<dyn Dependency> {
        Box::new(self.clone())
    }
}
