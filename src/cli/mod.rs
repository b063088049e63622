//! Command line interface.

pub mod args;
pub mod commands;
pub mod display;
pub mod prompt;
pub mod settings;
