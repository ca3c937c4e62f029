//! Progress reporting module

use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use std::time::Duration;
use wikicorpus_core::{ProgressObserver, RunSummary, StopReason};

/// Shows corpus growth against the size cap
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
}

impl ProgressReporter {
    /// Create a new progress reporter; a quiet reporter draws nothing
    pub fn new(quiet: bool, max_corpus_size: u64) -> Self {
        if quiet {
            return Self { progress_bar: None };
        }

        let pb = ProgressBar::new(max_corpus_size);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner} [{elapsed_precise}] {bar:40.cyan/blue} {bytes}/{total_bytes} {msg}")
        {
            pb.set_style(style.progress_chars("##-"));
        }
        pb.enable_steady_tick(Duration::from_millis(100));

        Self {
            progress_bar: Some(pb),
        }
    }
}

impl ProgressObserver for ProgressReporter {
    fn on_checkpoint(&mut self, blocks_attempted: u64, bytes_written: u64) {
        if let Some(pb) = &self.progress_bar {
            pb.set_position(bytes_written.min(pb.length().unwrap_or(u64::MAX)));
            pb.set_message(format!("{blocks_attempted} pages"));
        }
    }

    fn on_finish(&mut self, summary: &RunSummary) {
        if let Some(pb) = &self.progress_bar {
            let reason = match summary.stop_reason {
                StopReason::SizeCap => "size cap reached",
                StopReason::Exhausted => "dump exhausted",
            };
            pb.set_position(summary.bytes_written.min(pb.length().unwrap_or(u64::MAX)));
            pb.finish_with_message(format!(
                "{reason}, {} written",
                HumanBytes(summary.bytes_written)
            ));
        }
    }
}
