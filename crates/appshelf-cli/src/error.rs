//! CLI-specific error types and exit codes.

use thiserror::Error;

use appshelf_core::{
    CatalogError, CatalogView, OnboardingError, PathError, PreferencesError, SettingsError,
};

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Core domain error.
    #[error("{0}")]
    Core(String),

    /// Argument error, e.g. an unknown package key.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The download finished with a failure.
    #[error("{0}")]
    Download(String),

    /// The download was cancelled by the user.
    #[error("Download cancelled")]
    Cancelled,
}

impl CliError {
    /// Map error to an exit code.
    ///
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: see sysexits.h
    /// - 130: interrupted
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Core(_) | Self::Download(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
            Self::Cancelled => 130,
        }
    }

    /// The error for a failed catalog load, if it failed.
    ///
    /// A malformed document is a configuration problem; a missing or
    /// unreadable one is an I/O problem.
    pub fn from_catalog(view: &CatalogView) -> Option<Self> {
        let message = view.error_message.clone()?;
        Some(match view.error {
            Some(CatalogError::Parse(_)) => Self::Config(message),
            _ => Self::Io(message),
        })
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<PreferencesError> for CliError {
    fn from(err: PreferencesError) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<OnboardingError> for CliError {
    fn from(err: OnboardingError) -> Self {
        match err {
            OnboardingError::Preferences(e) => e.into(),
            OnboardingError::Permission(e) => Self::Core(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_sysexits() {
        assert_eq!(CliError::Core("x".into()).exit_code(), 1);
        assert_eq!(CliError::Arguments("x".into()).exit_code(), 2);
        assert_eq!(CliError::Io("x".into()).exit_code(), 74);
        assert_eq!(CliError::Config("x".into()).exit_code(), 78);
        assert_eq!(CliError::Download("x".into()).exit_code(), 1);
        assert_eq!(CliError::Cancelled.exit_code(), 130);
    }

    #[test]
    fn onboarding_storage_error_is_io() {
        let err: CliError =
            OnboardingError::Preferences(PreferencesError::Storage("disk full".into())).into();
        assert!(matches!(err, CliError::Io(_)));
    }

    fn failed_view(error: CatalogError) -> CatalogView {
        CatalogView {
            items: Vec::new(),
            error_message: Some(format!("Failed to load apps: {error}")),
            error: Some(error),
        }
    }

    #[test]
    fn malformed_catalog_is_config_error() {
        let err = CliError::from_catalog(&failed_view(CatalogError::Parse("expected `[`".into())))
            .unwrap();
        assert!(matches!(err, CliError::Config(_)));
        assert_eq!(err.exit_code(), 78);
        assert!(err.to_string().contains("Failed to load apps"));
    }

    #[test]
    fn missing_catalog_is_io_error() {
        let err = CliError::from_catalog(&failed_view(CatalogError::NotFound("catalog.json".into())))
            .unwrap();
        assert_eq!(err.exit_code(), 74);
    }

    #[test]
    fn loaded_catalog_is_not_an_error() {
        assert!(CliError::from_catalog(&CatalogView::default()).is_none());
    }

    #[test]
    fn download_message_is_shown_verbatim() {
        let err = CliError::Download("Install permission not granted".into());
        assert_eq!(err.to_string(), "Install permission not granted");
    }
}
