//! Progress spinner for CLI operations.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner for operations without a meaningful total
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Creates and starts a spinner, or a hidden one when quiet
    pub fn new(message: &str, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_message(message.to_string());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        };

        Self { bar }
    }

    /// Removes the spinner from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// Stops the spinner leaving a message
    pub fn fail(&self, msg: impl Into<String>) {
        self.bar.abandon_with_message(msg.into());
    }
}
