//! Core business logic modules.

pub mod batch;
pub mod executor;
pub mod locations;
pub mod planner;
pub mod script;
