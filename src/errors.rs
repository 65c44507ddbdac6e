/*!
 * Error types for the anki_carder application.
 *
 * This module contains custom error types for the different stages of a run,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when talking to the AnkiConnect endpoint
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when building or sending a request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request did not complete within its timeout
    #[error("Request timed out: {0}")]
    Timeout(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors that can occur while loading pairs or writing the pair cache
#[derive(Error, Debug)]
pub enum PairError {
    /// The input file does not exist
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The input file exists but could not be read
    #[error("Failed to read input file {}: {source}", .path.display())]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input could not be parsed as a document with `Front`/`Back` lists
    #[error("Malformed input {}: {message}", .path.display())]
    InputMalformed { path: PathBuf, message: String },

    /// The cache file could not be written
    #[error("Failed to write pair cache {}: {message}", .path.display())]
    CacheWrite { path: PathBuf, message: String },

    /// The cache file could not be read back
    #[error("Failed to read pair cache {}: {message}", .path.display())]
    CacheRead { path: PathBuf, message: String },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from loading pairs or writing the cache
    #[error("Pair error: {0}")]
    Pairs(#[from] PairError),

    /// Reading an answer from the console failed
    #[error("Prompt error: {0}")]
    Prompt(#[from] std::io::Error),

    /// Creating the deck failed at the transport level; this ends the run
    #[error("Failed to create deck '{deck}': {source}")]
    DeckCreationFailed {
        deck: String,
        #[source]
        source: ProviderError,
    },
}
