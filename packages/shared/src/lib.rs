//! Cross-cutting utilities shared by the terakoya packages.
//!
//! Keeps logging setup and time handling out of the server crate so that
//! every binary initializes them the same way.

pub mod logger;
pub mod time;
