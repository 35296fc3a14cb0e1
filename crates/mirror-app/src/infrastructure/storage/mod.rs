//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the TOML configuration file from the
//! platform-appropriate directory (or an explicit path), falls back to
//! defaults when the file does not exist yet, and can write a starter file.

pub mod config;
