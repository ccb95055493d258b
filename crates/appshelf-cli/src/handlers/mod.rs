//! Command handlers. Each receives the composed [`crate::CliContext`].

pub mod download;
pub mod list;
pub mod paths;
pub mod permissions;
pub mod settings;
