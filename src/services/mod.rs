//! External service integrations.

pub mod plex;
