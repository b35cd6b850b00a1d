//! Lightweight progress reporting for the research pipeline.
//!
//! Use `NoopProgress` for servers/headless runs and `IndicatifProgress` for
//! CLI/TTY.

use indicatif::{ProgressBar, ProgressStyle};

/// Minimal progress interface used inside the run() pipeline. Stages are
/// coarse labels ("search", "extract", "analysis", "done") with a completed
/// fraction in `0.0..=1.0`.
pub trait Progress: Send + Sync {
    /// Report entering/advancing a named stage.
    fn stage(&self, _name: &str, _fraction: f32) {}
    /// Finish the UI.
    fn finish(&self, _msg: &str) {}
}

/// No-op reporter for servers/headless runs.
#[derive(Default, Clone, Copy)]
pub struct NoopProgress;
impl Progress for NoopProgress {}

/// Indicatif-based spinner for interactive runs.
pub struct IndicatifProgress {
    pb: ProgressBar,
}

impl IndicatifProgress {
    /// Spinner (unknown total).
    pub fn spinner() -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap()
                .tick_chars("-\\|/ "),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { pb }
    }
}

impl Progress for IndicatifProgress {
    fn stage(&self, name: &str, fraction: f32) {
        self.pb
            .set_message(format!("{name} {:.0}%", fraction * 100.0));
    }

    fn finish(&self, msg: &str) {
        self.pb.finish_with_message(msg.to_string());
    }
}
