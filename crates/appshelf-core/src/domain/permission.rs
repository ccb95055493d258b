//! Host permission grants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The three independent host grants the application asks for.
///
/// Only [`Permission::InstallFromSource`] gates the download path; the other
/// two are part of onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Installing packages from this application.
    InstallFromSource,
    /// Exemption from background execution limits.
    BackgroundExecution,
    /// Posting notifications.
    NotificationPost,
}

impl Permission {
    /// All permissions in onboarding order.
    pub const ALL: [Self; 3] = [
        Self::InstallFromSource,
        Self::BackgroundExecution,
        Self::NotificationPost,
    ];

    /// Stable identifier used for persistence and the CLI.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InstallFromSource => "install_from_source",
            Self::BackgroundExecution => "background_execution",
            Self::NotificationPost => "notification_post",
        }
    }

    /// Short label used in user-facing messages.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::InstallFromSource => "Install",
            Self::BackgroundExecution => "Background execution",
            Self::NotificationPost => "Notification",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "install_from_source" | "install" => Ok(Self::InstallFromSource),
            "background_execution" | "background" | "battery" => Ok(Self::BackgroundExecution),
            "notification_post" | "notifications" | "notification" => Ok(Self::NotificationPost),
            other => Err(format!("unknown permission '{other}'")),
        }
    }
}
