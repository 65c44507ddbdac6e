// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use anki_carder::app_config::{self, Config, ConfigOverrides};
use anki_carder::prompt::ConsolePrompter;
use anki_carder::{AnkiConnect, Controller, RunOptions};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import word pairs into Anki (default command)
    Import(ImportArgs),

    /// Write the default configuration file
    InitConfig {
        /// Configuration file path
        #[arg(short, long, default_value = "anki_carder.json")]
        config_path: PathBuf,

        /// Replace an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completions for anki_carder
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct ImportArgs {
    /// YAML file with `Front` and `Back` lists
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Where to write the generated pairs as JSON
    #[arg(short = 'o', long)]
    cache_path: Option<PathBuf>,

    /// Deck to add the cards to (skips the deck prompt)
    #[arg(short, long)]
    deck: Option<String>,

    /// AnkiConnect endpoint URL
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Add cards without asking for confirmation
    #[arg(short, long)]
    yes: bool,

    /// Do not draw a progress bar while adding cards
    #[arg(long)]
    no_progress: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "anki_carder.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// anki_carder - word pair flashcards into Anki
///
/// Reads `Front`/`Back` word lists from a YAML file and adds each pair to Anki
/// as a Basic note through the AnkiConnect add-on.
#[derive(Parser, Debug)]
#[command(name = "anki_carder")]
#[command(version)]
#[command(about = "Import word pair flashcards into Anki")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "anki_carder reads Front/Back word lists from a YAML file, caches the pairs as JSON and adds them to Anki through AnkiConnect.

EXAMPLES:
    anki_carder                                 # Read input.yaml, ask before adding
    anki_carder words.yaml -d Deutsch           # Use words.yaml and the Deutsch deck
    anki_carder -y words.yaml                   # Do not ask for confirmation
    anki_carder -e http://127.0.0.1:8765        # Use another AnkiConnect endpoint
    anki_carder init-config                     # Write anki_carder.json with defaults
    anki_carder completions bash > anki_carder.bash

CONFIGURATION:
    Configuration is stored in anki_carder.json by default. You can specify a
    different file with --config-path. Without a config file the defaults are
    used; run `anki_carder init-config` to write one. Command line options take
    precedence.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    import: ImportArgs,
}

// @struct: Custom logger implementation; filtering is left to `log::max_level`
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
    fn decoration(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌", "1;31"),
            Level::Warn => ("🚧", "1;33"),
            Level::Info => ("", "1;32"),
            Level::Debug => ("🔍", "1;36"),
            Level::Trace => ("📋", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, color) = Self::decoration(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color,
                now,
                emoji,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "anki_carder", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::InitConfig { config_path, force }) => {
            Config::write_default(&config_path, force)?;
            log::info!("📝 Wrote default config to {}", config_path.display());
            Ok(())
        }
        Some(Commands::Import(args)) => run_import(args).await,
        None => run_import(cli.import).await,
    }
}

async fn run_import(options: ImportArgs) -> Result<()> {
    // Apply a command line log level before the config is read
    if let Some(level) = &options.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level((&level).into());
    }

    let mut config = Config::load_or_default(&options.config_path)?;
    config.apply_overrides(ConfigOverrides {
        input_path: options.input_path.clone(),
        cache_path: options.cache_path.clone(),
        endpoint_url: options.endpoint.clone(),
        log_level: options.log_level.clone().map(Into::into),
    });

    config.validate().context("Configuration validation failed")?;
    log::set_max_level((&config.log_level).into());

    let client = AnkiConnect::from_config(&config).context("Failed to create AnkiConnect client")?;
    let run_options = RunOptions {
        assume_yes: options.yes,
        deck: options.deck.clone(),
        show_progress: !options.no_progress,
    };

    let mut controller = Controller::new(config, client, ConsolePrompter, run_options);
    controller.run().await?;

    Ok(())
}
