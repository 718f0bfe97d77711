//! Configuration module for Course-Sweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use course_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sweep.toml")).unwrap();
//! println!("Token prefix: {}", config.auth.token_prefix);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ApiConfig, AuthConfig, ClientConfig, Config, OutputConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, config_digest, load_config, load_config_with_hash, parse_config};
