//! Permission grants simulated through preference flags.
//!
//! A terminal has no host grant dialog, so each grant is a boolean flag
//! named `granted.<permission>` in the preferences store. Requesting a
//! permission records the grant.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use appshelf_core::{Permission, PermissionError, PermissionPort, PreferencesError, PreferencesPort};

/// Prefix of the preference flags holding grants.
pub const GRANT_FLAG_PREFIX: &str = "granted.";

/// [`PermissionPort`] backed by a [`PreferencesPort`].
pub struct PreferencePermissions {
    preferences: Arc<dyn PreferencesPort>,
}

impl PreferencePermissions {
    pub fn new(preferences: Arc<dyn PreferencesPort>) -> Self {
        Self { preferences }
    }

    /// Flag name storing `permission`.
    pub fn flag_name(permission: Permission) -> String {
        format!("{GRANT_FLAG_PREFIX}{}", permission.as_str())
    }

    /// Record or remove a grant.
    pub fn set_granted(&self, permission: Permission, granted: bool) -> Result<(), PreferencesError> {
        self.preferences
            .set_flag(&Self::flag_name(permission), granted)?;
        info!(permission = %permission, granted, "Permission grant updated");
        Ok(())
    }
}

#[async_trait]
impl PermissionPort for PreferencePermissions {
    fn is_granted(&self, permission: Permission) -> bool {
        match self.preferences.get_flag(&Self::flag_name(permission)) {
            Ok(flag) => flag.unwrap_or(false),
            Err(e) => {
                warn!(permission = %permission, error = %e, "Could not read grant, treating as denied");
                false
            }
        }
    }

    async fn request(&self, permission: Permission) -> Result<(), PermissionError> {
        self.set_granted(permission, true)
            .map_err(|e| PermissionError::Query {
                permission,
                message: e.to_string(),
            })
    }
}
