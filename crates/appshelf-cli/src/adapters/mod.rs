//! Console implementations of the host ports.

mod installer;
mod notifier;
mod permissions;

pub use installer::CommandInstaller;
pub use notifier::ConsoleNotifier;
pub use permissions::{GRANT_FLAG_PREFIX, PreferencePermissions};
