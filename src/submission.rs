use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::time::Duration;

use crate::pairs::{Pair, PairList};
use crate::providers::anki_connect::AnkiConnect;
use crate::providers::Transport;

pub use crate::providers::anki_connect::SubmissionOutcome;

// @module: Sequential note submission and the end-of-run report

/// Characters of the front text shown while a note is being added
const PREVIEW_CHARS: usize = 30;

/// A pair that could not be added, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedNote {
    pub front: String,
    pub back: String,
    pub reason: String,
}

/// Outcome counts of one submission run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionReport {
    pub attempted: usize,
    pub successes: usize,
    pub failures: Vec<FailedNote>,
}

impl SubmissionReport {
    pub fn record(&mut self, pair: &Pair, outcome: SubmissionOutcome) {
        self.attempted += 1;
        match outcome {
            SubmissionOutcome::Success => self.successes += 1,
            SubmissionOutcome::Failure(reason) => self.failures.push(FailedNote {
                front: pair.front.clone(),
                back: pair.back.clone(),
                reason,
            }),
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human readable summary: the success count followed by every failure
    pub fn render(&self) -> String {
        let mut out = format!(
            "✅ Successfully added {}/{} cards to Anki!",
            self.successes, self.attempted
        );

        if !self.failures.is_empty() {
            out.push_str(&format!("\n\n❌ Failed to add {} cards:", self.failures.len()));
            for failed in &self.failures {
                out.push_str(&format!("\n  • {} → {}", failed.front, failed.back));
                out.push_str(&format!("\n    Error: {}", failed.reason));
            }
        }

        out
    }
}

/// First `max_chars` characters of `text`, with an ellipsis when cut
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Progress bar for `len` notes in the same style as the rest of the CLI
pub fn submission_progress_bar(len: u64) -> ProgressBar {
    let progress_bar = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} cards ({percent}%) {msg}",
        )
        .or_else(|_| {
            ProgressStyle::default_bar()
                .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}")
        })
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(style.progress_chars("█▓▒░"));
    progress_bar
}

/// Adds pairs as notes one at a time with a fixed pause after each
pub struct NoteSubmitter<'a, T: Transport> {
    client: &'a AnkiConnect<T>,
    delay: Duration,
    progress_bar: ProgressBar,
}

impl<'a, T: Transport> NoteSubmitter<'a, T> {
    pub fn new(client: &'a AnkiConnect<T>, delay: Duration) -> Self {
        Self {
            client,
            delay,
            progress_bar: ProgressBar::hidden(),
        }
    }

    /// Show progress on the given bar instead of a hidden one
    pub fn with_progress(mut self, progress_bar: ProgressBar) -> Self {
        self.progress_bar = progress_bar;
        self
    }

    /// Submit every pair exactly once, in order.
    ///
    /// Failures are recorded and the loop moves on.
    pub async fn submit_all(&self, pairs: &PairList, deck_name: &str) -> SubmissionReport {
        let mut report = SubmissionReport::default();
        let total = pairs.len();

        self.progress_bar.set_length(total as u64);
        info!("📚 Adding {} cards to deck '{}'...", total, deck_name);

        for (index, pair) in pairs.iter().enumerate() {
            self.progress_bar.set_message(format!(
                "{}/{}: {}",
                index + 1,
                total,
                preview(&pair.front, PREVIEW_CHARS)
            ));

            let outcome = self.client.add_note(&pair.front, &pair.back, deck_name).await;
            if let SubmissionOutcome::Failure(reason) = &outcome {
                self.progress_bar.suspend(|| {
                    warn!("Failed to add card: {}", pair.front);
                    warn!("   Error: {}", reason);
                });
            }
            report.record(pair, outcome);
            self.progress_bar.inc(1);

            tokio::time::sleep(self.delay).await;
        }

        self.progress_bar.finish_and_clear();
        report
    }
}
