//! Small pure helpers.

pub mod filename;

pub use filename::{artifact_file_name, sanitize_component};
