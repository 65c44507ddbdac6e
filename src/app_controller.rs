use log::{debug, error, info, warn};

use crate::app_config::Config;
use crate::errors::AppError;
use crate::pairs::{self, PairList};
use crate::prompt::{self, Prompter};
use crate::providers::anki_connect::AnkiConnect;
use crate::providers::Transport;
use crate::submission::{submission_progress_bar, NoteSubmitter, SubmissionReport};

// @module: Application controller driving one import run

/// Where a run currently stands. States only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Loaded,
    Confirmed,
    Probed,
    DeckReady,
    Submitting,
    Done,
    Aborted,
}

/// Why a run stopped before submitting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// The user did not confirm
    Cancelled,
    /// The version probe failed
    ConnectivityUnavailable,
    /// `createDeck` answered with a non-200 status
    DeckRejected { deck: String },
}

/// How a run that did not error ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Aborted(AbortReason),
    Completed(SubmissionReport),
}

/// Per-run switches coming from the command line
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Skip the confirmation question
    pub assume_yes: bool,
    /// Use this deck instead of asking
    pub deck: Option<String>,
    /// Draw a progress bar while submitting
    pub show_progress: bool,
}

/// Main application controller for importing pairs into Anki
pub struct Controller<T: Transport, P: Prompter> {
    // @field: App configuration
    config: Config,
    client: AnkiConnect<T>,
    prompter: P,
    options: RunOptions,
    state: RunState,
}

impl<T: Transport, P: Prompter> Controller<T, P> {
    pub fn new(config: Config, client: AnkiConnect<T>, prompter: P, options: RunOptions) -> Self {
        Self {
            config,
            client,
            prompter,
            options,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn client(&self) -> &AnkiConnect<T> {
        &self.client
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    fn advance(&mut self, next: RunState) {
        debug!("Run state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn abort(&mut self, reason: AbortReason) -> RunOutcome {
        self.advance(RunState::Aborted);
        RunOutcome::Aborted(reason)
    }

    /// Run the whole import: load, confirm, probe, create the deck, submit.
    ///
    /// Load errors and deck creation transport errors are returned as `Err`;
    /// every other way a run can stop is a `RunOutcome`.
    pub async fn run(&mut self) -> Result<RunOutcome, AppError> {
        let pairs = pairs::load_pairs(&self.config.input_path, &self.config.cache_path)?;
        self.advance(RunState::Loaded);
        self.show_pairs(&pairs);

        if !self.options.assume_yes {
            let answer = self.prompter.ask("\nProceed to add cards to Anki? (y/n): ")?;
            if !prompt::is_affirmative(&answer) {
                info!("❌ Operation cancelled");
                return Ok(self.abort(AbortReason::Cancelled));
            }
        }
        self.advance(RunState::Confirmed);

        let deck_name = self.deck_name()?;

        if !self.client.probe().await {
            error!("AnkiConnect is not available at {}. Please:", self.config.endpoint_url);
            error!("1. Install AnkiConnect add-on in Anki");
            error!("2. Make sure Anki is running");
            error!("3. Check that AnkiConnect is enabled");
            return Ok(self.abort(AbortReason::ConnectivityUnavailable));
        }
        self.advance(RunState::Probed);

        let created = self
            .client
            .ensure_deck(&deck_name)
            .await
            .map_err(|source| AppError::DeckCreationFailed {
                deck: deck_name.clone(),
                source,
            })?;
        if !created {
            error!("Failed to create deck '{}'", deck_name);
            return Ok(self.abort(AbortReason::DeckRejected { deck: deck_name }));
        }
        self.advance(RunState::DeckReady);

        self.advance(RunState::Submitting);
        let report = {
            let mut submitter = NoteSubmitter::new(&self.client, self.config.submit_delay());
            if self.options.show_progress {
                submitter = submitter.with_progress(submission_progress_bar(pairs.len() as u64));
            }
            submitter.submit_all(&pairs, &deck_name).await
        };

        println!("{}", report.render());
        self.advance(RunState::Done);
        Ok(RunOutcome::Completed(report))
    }

    fn show_pairs(&self, pairs: &PairList) {
        info!("📝 Generated {} word pairs", pairs.len());
        if pairs.is_empty() {
            warn!(
                "No pairs found in {}; check its Front and Back lists",
                self.config.input_path.display()
            );
        }
        match pairs.to_pretty_json() {
            Ok(json) => println!("{}", json),
            Err(e) => warn!("Could not render pairs: {}", e),
        }
    }

    fn deck_name(&mut self) -> Result<String, AppError> {
        let default = self.config.note.default_deck.clone();
        let answer = match &self.options.deck {
            Some(deck) => deck.clone(),
            None => self
                .prompter
                .ask(&format!("Enter deck name (default: {}): ", default))?,
        };
        Ok(prompt::resolve_deck_name(&answer, &default))
    }
}
