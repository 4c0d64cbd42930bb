//! Roadmap execution engine for goal-driven shell sessions.
//!
//! A free-text goal is turned into an ordered list of shell steps, which are
//! then run one at a time against a tracked working directory. The
//! architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (roadmap store, transition table,
//!   command classification, path resolution, feed). No I/O.
//! - **[`io`]**: Side-effecting operations (config files, process spawning,
//!   directory checks). Isolated to enable scripted runners in tests.
//!
//! Orchestration modules ([`session`], [`autorun`], [`planner`]) combine the two.

pub mod autorun;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod planner;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
