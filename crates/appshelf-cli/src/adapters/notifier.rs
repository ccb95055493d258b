//! Terminal notification surface.
//!
//! Each notification id owns one progress bar. Known percentages render as
//! a bar, indeterminate progress as a spinner, and a notification without
//! progress finishes the bar with its text.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::debug;

use appshelf_core::{NotificationId, NotificationPort, NotificationProgress};

const PERCENT_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}";
const SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {msg}";

/// [`NotificationPort`] drawing `indicatif` progress bars.
pub struct ConsoleNotifier {
    bars: Mutex<HashMap<NotificationId, ProgressBar>>,
    hidden: bool,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self {
            bars: Mutex::new(HashMap::new()),
            hidden: false,
        }
    }

    /// A notifier whose bars never draw.
    pub fn hidden() -> Self {
        Self {
            hidden: true,
            ..Self::new()
        }
    }

    /// Number of notifications currently on screen.
    pub fn active_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<NotificationId, ProgressBar>> {
        self.bars.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn spinner(&self) -> ProgressBar {
        let bar = ProgressBar::new_spinner();
        if self.hidden {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        bar.set_style(
            ProgressStyle::default_spinner()
                .template(SPINNER_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

fn percent_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(PERCENT_TEMPLATE)
        .map(|style| style.progress_chars("█▓░"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

impl NotificationPort for ConsoleNotifier {
    fn show(&self, id: NotificationId, title: &str, text: &str, progress: NotificationProgress) {
        debug!(id = %id, title, text, ?progress, "Notification");
        let mut bars = self.lock();

        match progress {
            NotificationProgress::Percent(percent) => {
                let bar = bars.entry(id).or_insert_with(|| self.spinner());
                if bar.length().is_none() {
                    bar.set_length(100);
                    bar.set_style(percent_style());
                }
                bar.set_position(u64::from(percent));
                bar.set_message(title.to_string());
            }
            NotificationProgress::Indeterminate => {
                let bar = bars.entry(id).or_insert_with(|| self.spinner());
                bar.set_message(format!("{title}: {text}"));
                bar.tick();
            }
            NotificationProgress::None => {
                let bar = bars.remove(&id).unwrap_or_else(|| self.spinner());
                bar.finish_with_message(format!("{title}: {text}"));
            }
        }
    }

    fn cancel(&self, id: NotificationId) {
        if let Some(bar) = self.lock().remove(&id) {
            debug!(id = %id, "Notification cancelled");
            bar.finish_and_clear();
        }
    }
}
