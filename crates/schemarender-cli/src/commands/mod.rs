//! CLI commands

pub mod exclusions;
pub mod render;
