use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::rescale::{format_duration, RescaledPosition};

/// Where progress goes. Implementations only observe, they never influence
/// what gets reported.
pub trait ProgressSink {
    /// The analysis moved to `pos`.
    fn render(&mut self, pos: &RescaledPosition);

    /// Print a report line on stdout without garbling any progress display.
    fn emit_line(&self, line: &str);

    /// Tear the display down. Also happens on drop.
    fn finish(&mut self);
}

/// An in-place spinner on stderr. The stream length is not known up front,
/// so there is no bar to fill, only a position readout.
pub struct BarSink {
    bar: ProgressBar,
}

impl BarSink {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg} [{elapsed_precise}]")
                .expect("the template is valid"),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }
}

impl Default for BarSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for BarSink {
    fn render(&mut self, pos: &RescaledPosition) {
        self.bar.set_message(format!(
            "time {}, frame {}",
            format_duration(pos.input_time),
            pos.input_frame
        ));
    }

    fn emit_line(&self, line: &str) {
        self.bar.suspend(|| println!("{line}"));
    }

    fn finish(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for BarSink {
    fn drop(&mut self) {
        self.finish();
    }
}

/// One log line per status update, for logs and non-interactive runs.
pub struct PlainSink;

impl ProgressSink for PlainSink {
    fn render(&mut self, pos: &RescaledPosition) {
        log::info!(
            "at time {}, frame {} (internal time {}, frame {})",
            format_duration(pos.input_time),
            pos.input_frame,
            format_duration(pos.internal_time),
            pos.internal_frame
        );
    }

    fn emit_line(&self, line: &str) {
        println!("{line}");
    }

    fn finish(&mut self) {}
}

/// Swallows progress entirely. Report lines still come through.
pub struct SilentSink;

impl ProgressSink for SilentSink {
    fn render(&mut self, _pos: &RescaledPosition) {}

    fn emit_line(&self, line: &str) {
        println!("{line}");
    }

    fn finish(&mut self) {}
}
