// src/cli/mod.rs
//! Command-line surface.

pub mod args;
pub mod handlers;

pub use args::Cli;
