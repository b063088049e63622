//! Name generators.

pub mod filename;
pub mod sanitize;
