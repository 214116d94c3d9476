//! Download progress display: an indicatif bar driven by the transfer
//! observer hooks, one bar per body transfer.

use indicatif::{ProgressBar, ProgressStyle};

use crate::transfer::TransferObserver;

pub struct TransferBar {
    bar: Option<ProgressBar>,
}

impl TransferBar {
    pub fn new() -> Self {
        Self { bar: None }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("  {msg} [{bar:30}] {bytes}/{total_bytes}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ")
    }
}

impl TransferObserver for TransferBar {
    fn begin(&mut self, name: &str, total: u64) {
        let bar = ProgressBar::new(total);
        bar.set_style(Self::style());
        bar.set_message(name.to_string());
        self.bar = Some(bar);
    }

    fn progress(&mut self, received: u64, _total: u64) {
        if let Some(bar) = &self.bar {
            bar.set_position(received);
        }
    }

    fn done(&mut self, name: &str, total: u64) {
        if let Some(bar) = self.bar.take() {
            bar.finish_with_message(format!("Download complete: {name} ({total} bytes)"));
        }
    }

    fn failed(&mut self, name: &str) {
        // Abandon leaves the bar on screen at its last position, so the
        // truncation point stays visible.
        if let Some(bar) = self.bar.take() {
            bar.abandon_with_message(format!("Download failed: {name}"));
        }
    }
}
