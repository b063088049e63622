//! Plex Renamer Library
//!
//! Turns a Plex library catalog into an ordered plan of copy/move operations,
//! then either performs them on disk or renders them as a shell script.

pub mod cli;
pub mod core;
pub mod error;
pub mod generators;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{Error, Result};
