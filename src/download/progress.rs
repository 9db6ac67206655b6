//! Per-transfer byte progress.

use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str =
    "{spinner:.cyan} [{bar:40.cyan/blue}] {bytes}/{total_bytes} @ {bytes_per_sec} - {msg}";
const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {bytes} @ {bytes_per_sec} - {msg}";

/// Creates the bar for one transfer, or a hidden one when `visible` is false.
///
/// Hosts that announce no size get a byte-counting spinner instead of a bar.
pub(crate) fn transfer_bar(visible: bool, expected_size: Option<u64>, name: &str) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let bar = match expected_size {
        Some(size) => {
            let bar = ProgressBar::new(size);
            bar.set_style(
                ProgressStyle::with_template(BAR_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("━━╌"),
            );
            bar
        }
        None => {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template(SPINNER_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar
        }
    };
    bar.set_message(name.to_string());
    bar
}
