//! Library surface of the shipwright CLI: config loading and the
//! explanation registries, reusable from the acceptance suite.

pub mod config;
pub mod explain;
