//! Common test utilities for testgen-core
//!
//! Shared fixtures for the integration tests.

#![allow(dead_code)]

mod fixtures;

pub use fixtures::*;
