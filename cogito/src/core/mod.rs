//! Deterministic, pure logic for the roadmap engine.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod dispatch;
pub mod feed;
pub mod path;
pub mod roadmap;
pub mod transitions;
pub mod types;
