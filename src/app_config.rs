use anyhow::{anyhow, Context, Result};
use log::{info, LevelFilter};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Settings for one import run, stored as JSON.
///
/// Every field has a default, so a partial file is valid.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// YAML file holding the `Front` and `Back` lists
    #[serde(default = "default_input_path")]
    pub input_path: PathBuf,

    /// JSON file the generated pairs are written to
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// AnkiConnect endpoint URL
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,

    /// AnkiConnect API version sent with every request
    #[serde(default = "default_api_version")]
    pub api_version: u32,

    /// Timeout for the availability probe in seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Timeout for deck and note requests in seconds; none waits indefinitely
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Delay after every note submission in milliseconds
    #[serde(default = "default_submit_delay_ms")]
    pub submit_delay_ms: u64,

    /// Note settings
    #[serde(default)]
    pub note: NoteConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings applied to every note created
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NoteConfig {
    /// Deck used when the user leaves the deck prompt blank
    #[serde(default = "default_deck")]
    pub default_deck: String,

    /// Note type; it must have `Front` and `Back` fields
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Tags attached to every note
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,
}

impl Default for NoteConfig {
    fn default() -> Self {
        Self {
            default_deck: default_deck(),
            model_name: default_model_name(),
            tags: default_tags(),
        }
    }
}

/// Values given on the command line; `None` keeps the file value
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input_path: Option<PathBuf>,
    pub cache_path: Option<PathBuf>,
    pub endpoint_url: Option<String>,
    pub log_level: Option<LogLevel>,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_input_path() -> PathBuf {
    PathBuf::from("input.yaml")
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("Pairs.json")
}

fn default_endpoint_url() -> String {
    "http://localhost:8765".to_string()
}

fn default_api_version() -> u32 {
    6
}

fn default_probe_timeout_secs() -> u64 {
    5
}

fn default_submit_delay_ms() -> u64 {
    100
}

fn default_deck() -> String {
    "Українська".to_string()
}

fn default_model_name() -> String {
    "Basic".to_string()
}

fn default_tags() -> Vec<String> {
    vec!["anki_carder".to_string()]
}

impl Config {
    /// Load the configuration file, falling back to defaults when it does not exist.
    ///
    /// A missing file is not created; use [`Config::write_default`] for that.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!("No config file at '{}', using defaults.", path.display());
            return Ok(Config::default());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the default configuration to `path`.
    ///
    /// An existing file is left alone unless `overwrite` is set.
    pub fn write_default<P: AsRef<Path>>(path: P, overwrite: bool) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() && !overwrite {
            return Err(anyhow!("Config file already exists: {}", path.display()));
        }

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json).with_context(|| {
            format!("Failed to write default config to file: {}", path.display())
        })?;

        Ok(config)
    }

    /// Replace file values with the ones given on the command line
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(input_path) = overrides.input_path {
            self.input_path = input_path;
        }
        if let Some(cache_path) = overrides.cache_path {
            self.cache_path = cache_path;
        }
        if let Some(endpoint_url) = overrides.endpoint_url {
            self.endpoint_url = endpoint_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.log_level = log_level;
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let endpoint = Url::parse(&self.endpoint_url)
            .with_context(|| format!("Invalid endpoint URL: {}", self.endpoint_url))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(anyhow!("Endpoint URL must use http or https: {}", self.endpoint_url));
        }

        if self.input_path.as_os_str().is_empty() {
            return Err(anyhow!("Input path must not be empty"));
        }
        if self.cache_path.as_os_str().is_empty() {
            return Err(anyhow!("Cache path must not be empty"));
        }
        if self.probe_timeout_secs == 0 {
            return Err(anyhow!("Probe timeout must be at least one second"));
        }
        if self.note.model_name.trim().is_empty() {
            return Err(anyhow!("Note model name must not be empty"));
        }
        if self.note.default_deck.trim().is_empty() {
            return Err(anyhow!("Default deck name must not be empty"));
        }

        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            input_path: default_input_path(),
            cache_path: default_cache_path(),
            endpoint_url: default_endpoint_url(),
            api_version: default_api_version(),
            probe_timeout_secs: default_probe_timeout_secs(),
            request_timeout_secs: None,
            submit_delay_ms: default_submit_delay_ms(),
            note: NoteConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
