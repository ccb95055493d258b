//! Command-line adapter for appshelf.
//!
//! [`bootstrap`] is the composition root: it resolves paths, loads settings
//! and wires the file-backed stores, console adapters and the download
//! manager into a [`CliContext`]. Handlers only see the context.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary target only
use dotenvy as _;
use tracing_subscriber as _;

// Used by the integration tests only
#[cfg(test)]
use wiremock as _;

pub mod adapters;
pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::{Commands, PermissionsCommand, SettingsCommand};
pub use error::CliError;
pub use parser::Cli;
