//! Active dependency snapshot

use crate::features::dependency::ports::Dependency;
use crate::shared::models::OperandId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One active dependency, as reported by `value()` of the dependency iterators
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyLink {
    pub kind: String,
    pub determinant: OperandId,
    pub dependent: OperandId,
}

impl DependencyLink {
    pub fn of(dependency: &dyn Dependency) -> Self {
        Self {
            kind: dependency.kind().to_string(),
            determinant: dependency.determinant(),
            dependent: dependency.dependent(),
        }
    }
}

impl fmt::Display for DependencyLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.determinant, self.dependent, self.kind)
    }
}
