//! Spinner for the visual classification stages.

use indicatif::{ProgressBar, ProgressStyle};
use site_atlas::visual::ClassifyStage;
use std::time::Duration;

/// A spinner on stderr, or a hidden bar when `visible` is false.
pub fn create_spinner(message: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} {msg}") {
        bar.set_style(style.tick_chars("\u{25b8}\u{25b9}\u{25b8}\u{25b9}\u{25b8}"));
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Reflect a pipeline stage on the spinner.
pub fn show_stage(bar: &ProgressBar, stage: ClassifyStage) {
    match stage {
        ClassifyStage::Complete => bar.finish_and_clear(),
        _ => bar.set_message(stage.label()),
    }
}
