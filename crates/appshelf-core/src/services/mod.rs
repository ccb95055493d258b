//! Application services composed over ports.

mod catalog_service;
mod onboarding;
mod settings_service;

pub use catalog_service::{CatalogService, CatalogView};
pub use onboarding::{FIRST_LAUNCH_FLAG, OnboardingError, OnboardingService, OnboardingState};
pub use settings_service::SettingsService;
