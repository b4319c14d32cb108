//! Terminal widgets: indicatif builders and the tracing/progress bridge.

pub mod progress;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown while a single domain is being probed.
pub fn probe_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .expect("Spinner template is hardcoded and should be valid"),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Bar tracking a refresh run, one tick per probed domain. The message slot
/// shows the name of the domain whose report last came in.
pub fn refresh_progress_bar(total: usize) -> ProgressBar {
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("Progress bar template is hardcoded and should be valid")
            .progress_chars("█▓░"),
    );
    bar
}
