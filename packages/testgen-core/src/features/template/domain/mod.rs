mod classes;

pub use classes::{EquivalenceClass, InstructionClasses};
