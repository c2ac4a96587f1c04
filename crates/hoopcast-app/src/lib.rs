// Library root: exposes config, CLI, and rendering so integration tests can
// drive the binary's pieces directly.

pub mod cli;
pub mod config;
pub mod render;
