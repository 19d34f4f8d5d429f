//! Progress display for fetch and rewrite phases
//!
//! Draws on stderr through indicatif so stdout stays clean for the
//! text, JSON and diff formatters.

use indicatif::{ProgressBar, ProgressStyle};

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Spinner while files are fetched, bar while dependencies are applied
pub struct Progress {
    enabled: bool,
    bar: Option<ProgressBar>,
}

impl Progress {
    /// Create a progress reporter; a disabled one draws nothing
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    /// Progress is shown only for interactive text output
    pub fn for_output(quiet: bool, json: bool) -> Self {
        Self::new(!quiet && !json)
    }

    /// Returns true if anything will be drawn
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Show an indeterminate spinner
    pub fn spinner(&mut self, message: &str) {
        if !self.enabled {
            return;
        }
        self.clear();

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .tick_chars(TICK_CHARS)
                .template("{spinner:.cyan} {msg}")
                .expect("Invalid template"),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        self.bar = Some(pb);
    }

    /// Show a bar over `total` dependencies
    pub fn dependencies(&mut self, total: usize) {
        if !self.enabled || total == 0 {
            return;
        }
        self.clear();

        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid template")
                .progress_chars("=> "),
        );
        self.bar = Some(pb);
    }

    /// Name the dependency currently being applied
    pub fn working_on(&self, name: &str) {
        if let Some(pb) = &self.bar {
            pb.set_message(name.to_string());
        }
    }

    /// Mark one dependency as done
    pub fn advance(&self) {
        if let Some(pb) = &self.bar {
            pb.inc(1);
        }
    }

    /// Remove whatever is currently drawn
    pub fn clear(&mut self) {
        if let Some(pb) = self.bar.take() {
            pb.finish_and_clear();
        }
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.clear();
    }
}
