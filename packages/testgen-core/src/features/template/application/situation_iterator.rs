//! Odometer over the situations attached to a program
//!
//! Situation state lives inside the instructions, so the iterator only keeps
//! the positions it walks and operates on the program it is handed.

use crate::shared::models::Program;

#[derive(Debug, Clone, Default)]
pub struct SituationIterator {
    positions: Vec<usize>,
    has_value: bool,
}

impl SituationIterator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every situation of `program` to its first variant
    pub fn init(&mut self, program: &mut Program) {
        self.positions = program
            .iter()
            .enumerate()
            .filter(|(_, instruction)| instruction.situation.is_some())
            .map(|(position, _)| position)
            .collect();

        self.has_value = true;
        for &position in &self.positions {
            if let Some(situation) = program.get_mut(position).and_then(|i| i.situation_mut()) {
                situation.init();
                if !situation.has_value() {
                    self.has_value = false;
                }
            }
        }
    }

    pub fn has_value(&self) -> bool {
        self.has_value
    }

    pub fn next(&mut self, program: &mut Program) {
        assert!(self.has_value, "next() on exhausted situation iterator");
        for &position in self.positions.iter().rev() {
            let Some(situation) = program.get_mut(position).and_then(|i| i.situation_mut()) else {
                continue;
            };
            situation.next();
            if situation.has_value() {
                return;
            }
            situation.init();
        }
        self.has_value = false;
    }

    pub fn stop(&mut self) {
        self.has_value = false;
    }

    pub fn situation_count(&self) -> usize {
        self.positions.len()
    }
}
