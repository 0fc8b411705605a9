//! Deterministic, pure logic for the intake wizard.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod answers;
pub mod fields;
pub mod invariants;
pub mod resolver;
pub mod types;
pub mod wizard;
