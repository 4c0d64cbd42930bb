//! Side-effecting helpers: configuration, process spawning, shell steps and
//! the tracked working directory.

pub mod config;
pub mod process;
pub mod shell;
pub mod workdir;
