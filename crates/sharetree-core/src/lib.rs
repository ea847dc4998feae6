//! Shared types for the sharetree workspace.
//!
//! This crate holds what the front ends have in common and the tree
//! library does not need:
//! - Error hierarchy for configuration and argument handling
//! - CLI output formats and exit codes
//! - TOML configuration

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod error;

pub mod cli;
pub mod config;

pub use config::Config;
pub use error::{Error, Result};
