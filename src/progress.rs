//! Terminal progress for a report run
//!
//! A single indicatif line on stderr: a spinner while the POM is read, then
//! a bar advanced once per checked dependency with its coordinate alongside.

use crate::domain::Dependency;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::Path;
use std::time::Duration;

const READING_TEMPLATE: &str = "{spinner:.cyan} Reading {msg}";
const CHECKING_TEMPLATE: &str =
    "{spinner:.cyan} Checking [{bar:30.cyan/blue}] {pos}/{len} {wide_msg:.dim}";
const TICKS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ";

/// Progress line of one report run
pub struct Progress {
    visible: bool,
    bar: ProgressBar,
}

impl Progress {
    /// A progress line drawn only when `visible`
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            bar: ProgressBar::hidden(),
        }
    }

    /// A progress line that never draws but still counts
    pub fn hidden() -> Self {
        Self::new(false)
    }

    /// Spinner shown while `pom` is parsed
    pub fn reading(&mut self, pom: &Path) {
        self.replace(ProgressBar::new_spinner(), READING_TEMPLATE, 80);
        self.bar.set_message(pom.display().to_string());
    }

    /// Bar over `total` dependencies
    pub fn checking(&mut self, total: usize) {
        self.replace(ProgressBar::new(total as u64), CHECKING_TEMPLATE, 100);
    }

    /// One more dependency has its update set
    pub fn checked(&self, dependency: &Dependency) {
        self.bar.set_message(dependency.coordinate());
        self.bar.inc(1);
    }

    /// Dependencies checked since the last `checking`
    pub fn checked_count(&self) -> u64 {
        self.bar.position()
    }

    /// Erase the line
    pub fn finish(&mut self) {
        self.bar.finish_and_clear();
        self.bar = ProgressBar::hidden();
    }

    fn replace(&mut self, bar: ProgressBar, template: &str, tick_millis: u64) {
        self.bar.finish_and_clear();
        if self.visible {
            if let Ok(style) = ProgressStyle::with_template(template) {
                bar.set_style(style.tick_chars(TICKS).progress_chars("█▓▒░"));
            }
            bar.enable_steady_tick(Duration::from_millis(tick_millis));
        } else {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        self.bar = bar;
    }
}
