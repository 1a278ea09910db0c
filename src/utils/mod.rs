//! Configuration utilities.

/// `delve.toml` loading and validation.
pub mod toml_config;
