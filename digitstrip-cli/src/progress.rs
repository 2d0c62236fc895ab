//! Terminal progress bar for dataset downloads.

use digitstrip_core::FetchProgress;
use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{msg} [{elapsed_precise}] {wide_bar} {bytes}/{total_bytes} ({eta})";

/// Draws one bar per downloaded archive on stderr.
///
/// Nothing is drawn when stderr is not a terminal.
#[derive(Debug, Default)]
pub struct DownloadProgress {
    bar: Option<ProgressBar>,
    hidden: bool,
}

impl DownloadProgress {
    /// A progress reporter that draws bars.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A progress reporter that tracks bars without drawing them.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            bar: None,
            hidden: true,
        }
    }

    /// Bytes recorded on the active bar, if a transfer is running.
    #[must_use]
    pub fn position(&self) -> Option<u64> {
        self.bar.as_ref().map(ProgressBar::position)
    }
}

impl FetchProgress for DownloadProgress {
    fn start(&mut self, name: &str, declared_len: u64) {
        let bar = if self.hidden {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(declared_len)
        };
        bar.set_length(declared_len);
        if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_message(name.to_owned());
        self.bar = Some(bar);
    }

    fn advance(&mut self, bytes: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(bytes);
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
