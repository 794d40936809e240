// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use crate::app_config::{Config, LogLevel};
use crate::seed::SeedGenerator;
use crate::store::Store;

mod app_config;
mod errors;
mod seed;
mod store;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the database and initialize its schema without seeding it
    Init,

    /// Populate the database with generated sample data (default command)
    #[command(alias = "populate")]
    Seed,

    /// Print row counts and the database file size
    Stats,

    /// Generate shell completions for registrar
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Registrar - Student records store
///
/// An embedded student records database with repositories for admins,
/// students, courses, modules, assessments, enrollments and results,
/// plus a sample data generator.
#[derive(Parser, Debug)]
#[command(name = "registrar")]
#[command(version = "1.0.0")]
#[command(about = "Student records store with sample data seeding")]
#[command(long_about = "Registrar manages an embedded SQLite student records database and can
populate it with generated sample data.

EXAMPLES:
    registrar                                   # Seed the default database
    registrar init                              # Create an empty database
    registrar seed                              # Top the database up to the configured targets
    registrar stats                             # Show row counts and file size
    registrar --db ./records.db seed            # Seed a specific database file
    registrar --log-level debug seed            # Seed with debug logging
    registrar completions bash > registrar.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically. The database location comes from --db,
    then the config file, then the platform data directory.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Database file path (overrides the configuration file)
    #[arg(short, long, value_name = "DB_PATH")]
    db: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
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

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "registrar", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Init) => run_init(&cli),
        Some(Commands::Stats) => run_stats(&cli),
        Some(Commands::Seed) | None => {
            // Default behavior - seed the database
            run_seed(&cli)
        }
    }
}

/// Load the configuration and open the store, applying CLI overrides
fn prepare(options: &CommandLineOptions) -> Result<(Config, Store)> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    // Load or create configuration
    let mut config = load_or_create_config(&options.config_path)?;

    // Override config with CLI options if provided
    if let Some(db) = &options.db {
        config.database_path = Some(db.clone());
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        // Just update the max level without reinitializing the logger
        log::set_max_level(level_filter(&config.log_level));
    }

    let store = match &config.database_path {
        Some(path) => Store::open(path)
            .with_context(|| format!("Failed to open database at {:?}", path))?,
        None => Store::open_default().context("Failed to open default database")?,
    };
    info!("Using database at {:?}", store.db.path());

    Ok((config, store))
}

/// Load the configuration file, creating it with defaults when absent
fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        Ok(config)
    } else {
        // Create default configuration if not exists
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );

        let config = Config::default();

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        Ok(config)
    }
}

// @returns: Max level filter for a configured log level
fn level_filter(level: &LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}

fn run_init(options: &CommandLineOptions) -> Result<()> {
    let (_, store) = prepare(options)?;

    info!("Database initialized");
    println!("{}", store.stats()?);

    Ok(())
}

fn run_seed(options: &CommandLineOptions) -> Result<()> {
    let (config, store) = prepare(options)?;

    let generator = SeedGenerator::new(store, config.seed.clone());
    let summary = generator.populate().context("Failed to seed database")?;

    if summary.is_empty() {
        info!("All seed targets already met, nothing to add");
    }
    println!("{}", summary);

    Ok(())
}

fn run_stats(options: &CommandLineOptions) -> Result<()> {
    let (_, store) = prepare(options)?;

    println!("{}", store.stats()?);

    Ok(())
}
