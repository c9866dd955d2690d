//! Configuration module for ChalkX
//!
//! Provides types and loading for the `chalkx.toml` configuration file.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
