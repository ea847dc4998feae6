//! Command implementations for the sharetree CLI.
//!
//! Each command module loads what it needs through a
//! [`Session`](common::Session), performs its operation and formats the
//! result according to the requested output format.

pub mod add;
pub mod archive;
pub mod cat;
pub mod common;
pub mod completions;
pub mod config;
pub mod edit;
pub mod init;
pub mod ls;
pub mod open;
pub mod share;
pub mod transfer;
