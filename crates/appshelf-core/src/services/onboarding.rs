//! First-launch permission onboarding.
//!
//! The permission screen is shown only on first launch and only while some
//! grant is missing. Once every grant is held during first launch the
//! `is_first_launch` flag is cleared and never set again.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::Permission;
use crate::ports::{PermissionError, PermissionPort, PreferencesError, PreferencesPort};

/// Preference flag recording whether onboarding is still pending.
pub const FIRST_LAUNCH_FLAG: &str = "is_first_launch";

/// Snapshot of the onboarding screen state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OnboardingState {
    pub install_granted: bool,
    pub background_exempt: bool,
    pub notifications_granted: bool,
    /// `first_launch && !all_granted`.
    pub show_permission_screen: bool,
    /// `!first_launch || all_granted`.
    pub all_permissions_handled: bool,
}

impl OnboardingState {
    /// Whether every grant is held.
    #[must_use]
    pub const fn all_granted(&self) -> bool {
        self.install_granted && self.background_exempt && self.notifications_granted
    }

    /// Grant status for one permission.
    #[must_use]
    pub const fn is_granted(&self, permission: Permission) -> bool {
        match permission {
            Permission::InstallFromSource => self.install_granted,
            Permission::BackgroundExecution => self.background_exempt,
            Permission::NotificationPost => self.notifications_granted,
        }
    }
}

/// Errors from onboarding operations.
#[derive(Debug, Error)]
pub enum OnboardingError {
    #[error(transparent)]
    Preferences(#[from] PreferencesError),

    #[error(transparent)]
    Permission(#[from] PermissionError),
}

/// Onboarding state machine over preferences and host grants.
pub struct OnboardingService {
    preferences: Arc<dyn PreferencesPort>,
    permissions: Arc<dyn PermissionPort>,
}

impl OnboardingService {
    pub fn new(preferences: Arc<dyn PreferencesPort>, permissions: Arc<dyn PermissionPort>) -> Self {
        Self {
            preferences,
            permissions,
        }
    }

    fn is_first_launch(&self) -> Result<bool, OnboardingError> {
        Ok(self.preferences.get_flag(FIRST_LAUNCH_FLAG)?.unwrap_or(true))
    }

    fn snapshot(&self, first_launch: bool) -> OnboardingState {
        let mut state = OnboardingState {
            install_granted: self.permissions.is_granted(Permission::InstallFromSource),
            background_exempt: self.permissions.is_granted(Permission::BackgroundExecution),
            notifications_granted: self.permissions.is_granted(Permission::NotificationPost),
            ..OnboardingState::default()
        };
        let all = state.all_granted();
        state.show_permission_screen = first_launch && !all;
        state.all_permissions_handled = !first_launch || all;
        state
    }

    /// Compute the current state without side effects.
    pub fn check(&self) -> Result<OnboardingState, OnboardingError> {
        let first_launch = self.is_first_launch()?;
        Ok(self.snapshot(first_launch))
    }

    /// Recompute after the host returns from a permission flow.
    ///
    /// Clears the first-launch flag once every grant is held.
    pub fn refresh(&self) -> Result<OnboardingState, OnboardingError> {
        let state = self.check()?;
        if state.all_granted() {
            self.complete_if_all_granted()?;
        }
        Ok(state)
    }

    /// Start the host request flow for `permission`.
    pub async fn request(&self, permission: Permission) -> Result<OnboardingState, OnboardingError> {
        debug!(%permission, "Requesting permission");
        self.permissions.request(permission).await?;
        self.refresh()
    }

    /// Persist `is_first_launch = false` if every grant is held.
    ///
    /// Returns whether onboarding is complete.
    pub fn complete_if_all_granted(&self) -> Result<bool, OnboardingError> {
        let state = self.snapshot(false);
        if !state.all_granted() {
            return Ok(false);
        }
        if self.is_first_launch()? {
            self.preferences.set_flag(FIRST_LAUNCH_FLAG, false)?;
            info!("All permissions granted, onboarding complete");
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockPermissionPort;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryPreferences {
        flags: Mutex<HashMap<String, bool>>,
    }

    impl PreferencesPort for MemoryPreferences {
        fn get_flag(&self, name: &str) -> Result<Option<bool>, PreferencesError> {
            Ok(self.flags.lock().unwrap().get(name).copied())
        }

        fn set_flag(&self, name: &str, value: bool) -> Result<(), PreferencesError> {
            self.flags.lock().unwrap().insert(name.to_string(), value);
            Ok(())
        }
    }

    fn permissions(granted: &'static [Permission]) -> MockPermissionPort {
        let mut mock = MockPermissionPort::new();
        mock.expect_is_granted()
            .returning(move |p| granted.contains(&p));
        mock
    }

    #[test]
    fn first_launch_with_missing_grant_shows_screen() {
        let prefs = Arc::new(MemoryPreferences::default());
        let service = OnboardingService::new(
            prefs,
            Arc::new(permissions(&[Permission::InstallFromSource])),
        );

        let state = service.check().unwrap();
        assert!(state.install_granted);
        assert!(!state.notifications_granted);
        assert!(state.show_permission_screen);
        assert!(!state.all_permissions_handled);
    }

    #[test]
    fn not_first_launch_is_handled_even_without_grants() {
        let prefs = Arc::new(MemoryPreferences::default());
        prefs.set_flag(FIRST_LAUNCH_FLAG, false).unwrap();
        let service = OnboardingService::new(prefs, Arc::new(permissions(&[])));

        let state = service.check().unwrap();
        assert!(!state.show_permission_screen);
        assert!(state.all_permissions_handled);
    }

    #[test]
    fn refresh_with_all_granted_clears_flag() {
        let prefs = Arc::new(MemoryPreferences::default());
        let service = OnboardingService::new(prefs.clone(), Arc::new(permissions(&Permission::ALL)));

        let state = service.refresh().unwrap();
        assert!(state.all_permissions_handled);
        assert!(!state.show_permission_screen);
        assert_eq!(prefs.get_flag(FIRST_LAUNCH_FLAG).unwrap(), Some(false));
    }

    #[test]
    fn complete_without_all_grants_keeps_flag() {
        let prefs = Arc::new(MemoryPreferences::default());
        let service = OnboardingService::new(
            prefs.clone(),
            Arc::new(permissions(&[Permission::NotificationPost])),
        );

        assert!(!service.complete_if_all_granted().unwrap());
        assert_eq!(prefs.get_flag(FIRST_LAUNCH_FLAG).unwrap(), None);
    }

    #[tokio::test]
    async fn request_delegates_to_port() {
        let prefs = Arc::new(MemoryPreferences::default());
        let mut mock = permissions(&[]);
        mock.expect_request()
            .withf(|p| *p == Permission::BackgroundExecution)
            .times(1)
            .returning(|_| Ok(()));
        let service = OnboardingService::new(prefs, Arc::new(mock));

        let state = service.request(Permission::BackgroundExecution).await.unwrap();
        assert!(state.show_permission_screen);
    }
}
