//! wikicorpus CLI library
//!
//! This library provides the command-line interface for building
//! sentence-per-line corpora from MediaWiki XML dumps.

pub mod commands;
pub mod config;
pub mod error;
pub mod progress;

pub use error::{CliError, CliResult};
