//! envstack library
//!
//! This module exports the resolution pipeline for embedding and testing.

pub mod cli;
pub mod config;
pub mod error;
pub mod report;

pub use config::{ConfigOptions, ConfigResolver, MergedConfig};
pub use error::{ConfigError, ConfigResult};
