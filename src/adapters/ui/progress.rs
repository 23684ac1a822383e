//! indicatif progress indicators for model calls.

use indicatif::{ProgressBar, ProgressStyle};
use std::borrow::Cow;
use std::time::Duration;

const BATCH_TEMPLATE: &str = "{spinner:.magenta} [{bar:32.magenta/yellow}] {pos}/{len} {msg}";
const SPINNER_TEMPLATE: &str = "{spinner:.yellow} {msg} ({elapsed})";

/// Bar for `len` sequential report generations.
pub fn batch_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template(BATCH_TEMPLATE) {
        bar.set_style(style.progress_chars("█▓░"));
    }
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Spinner for a single long-running call. Clear it with `finish_and_clear`.
pub fn spinner(message: impl Into<Cow<'static, str>>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template(SPINNER_TEMPLATE) {
        spinner.set_style(style.tick_chars("✶✸✹✺✹✷ "));
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
