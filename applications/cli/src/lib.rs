//! Setlist CLI Library
//!
//! Command-line front end for the Setlist ordered playlist store.
//!
//! This library exposes the command layer for testing purposes.

pub mod commands;
pub mod config;
pub mod error;

// Re-export commonly used types for convenience
pub use commands::App;
pub use config::CliConfig;
pub use error::{CliError, Result};
