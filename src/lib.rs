/*!
 * # anki_carder - word pair flashcards into Anki
 *
 * A Rust library for importing word pairs from a YAML file into Anki through
 * the AnkiConnect add-on.
 *
 * ## Features
 *
 * - Read `Front`/`Back` lists from YAML and pair them up
 * - Cache the generated pairs as pretty-printed JSON
 * - Check that AnkiConnect is reachable before doing anything
 * - Create the target deck and add every pair as a `Basic` note
 * - Summarize successes and failures at the end of a run
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `pairs`: Pair loading and the JSON pair cache
 * - `providers`: AnkiConnect client and transports:
 *   - `providers::anki_connect`: Request shapes, HTTP transport and client
 *   - `providers::mock`: Scripted transport for tests
 * - `submission`: Sequential note submission and the run report
 * - `prompt`: Interactive questions behind a trait
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod pairs;
pub mod prompt;
pub mod providers;
pub mod submission;

// Re-export main types for easier usage
pub use app_config::{Config, ConfigOverrides};
pub use app_controller::{AbortReason, Controller, RunOptions, RunOutcome, RunState};
pub use errors::{AppError, PairError, ProviderError};
pub use pairs::{load_pairs, Pair, PairList};
pub use providers::anki_connect::{AnkiConnect, HttpTransport};
pub use submission::{NoteSubmitter, SubmissionOutcome, SubmissionReport};
