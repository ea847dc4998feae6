//! Sharetree CLI library.
//!
//! Exposes the argument definitions, command handlers and formatters of
//! the `sharetree` binary so they can be tested without spawning it.

#![allow(clippy::format_push_string)]
#![allow(clippy::unused_async)]

pub mod actions;
pub mod cli;
pub mod commands;
pub mod formatters;
pub mod runner;

pub use actions::ConfigAction;
pub use cli::{Cli, Commands};
