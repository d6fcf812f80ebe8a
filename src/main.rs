//! Lanai - Main entrypoint.
//!
//! Initializes logging from configuration and runs one of the subcommands
//! against a fresh [`LanaiTrie`].

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use lanai_lib::config::{self, ConfigLoader, LanaiConfig, LogConfig};
use lanai_lib::data_structures::LanaiTrie;
use lanai_lib::error::{
    get_error_reporting, set_error_reporter, ErrorContext, LanaiError, LanaiResult,
    TracingErrorReporter,
};
use lanai_lib::script::Script;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line arguments for Lanai.
#[derive(Parser, Debug)]
#[clap(name = "Lanai", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Run an operation script against an empty trie
    Run {
        /// Path to the TOML script
        #[clap(value_parser)]
        script: PathBuf,
    },

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },
}

/// Initialize the logging system. `RUST_LOG` takes precedence over the
/// configured level.
fn init_logging(log: &LogConfig) -> LanaiResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_line_number(log.source_location)
        .with_file(log.source_location)
        .with_thread_names(true);

    let result = if log.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.pretty().finish())
    };
    result.map_err(|e| LanaiError::Custom(format!("Failed to set global tracing subscriber: {e}")))
}

fn run_script(path: &Path, config: &LanaiConfig) -> LanaiResult<()> {
    let script = Script::from_path(path)?;
    info!("Running {} steps from {:?}", script.steps().len(), path);

    let trie = LanaiTrie::with_config(config.trie.clone());
    info!(max_key_len = ?trie.config().max_key_len(), "trie ready");
    let report = script.run(&trie);

    println!(
        "{} steps, {} succeeded, {} keys remaining, {} unmet expectations",
        report.outcomes().len(),
        report.succeeded(),
        trie.len(),
        report.unmet_expectations().count()
    );
    if !report.passed() {
        for outcome in report.unmet_expectations() {
            println!(
                "  step {}: expected {:?}, got {} ({})",
                outcome.index,
                outcome.expected,
                outcome.succeeded,
                outcome.detail.as_deref().unwrap_or("no detail")
            );
        }
        process::exit(2);
    }
    Ok(())
}

/// Main entry point for the application.
fn main() -> LanaiResult<()> {
    let args = Args::parse();

    let config_loader = ConfigLoader::new(args.config.as_deref(), config::ENV_PREFIX);
    let loaded = config_loader.load();

    // Logging depends on configuration, so fall back to defaults until it loads
    let log_config = loaded
        .as_ref()
        .map(|c| c.log.clone())
        .unwrap_or_default();
    init_logging(&log_config)?;
    set_error_reporter(Arc::new(TracingErrorReporter));

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            get_error_reporting().report(
                ErrorContext::new(LanaiError::Config(e), "config")
                    .with_details(format!("config path: {:?}", args.config)),
            );
            process::exit(1);
        }
    };

    match args.command {
        Command::Run { script } => {
            config::init_global_config(config.clone());
            if let Err(e) = run_script(&script, &config) {
                get_error_reporting().report(ErrorContext::new(e, "script"));
                process::exit(1);
            }
            Ok(())
        }
        Command::Validate => {
            info!("Configuration validated successfully");
            Ok(())
        }
        Command::GenConfig { output } => {
            info!("Generating default configuration");
            let default_config = LanaiConfig::default();

            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let toml = toml::to_string_pretty(&default_config)
                .map_err(|e| LanaiError::Custom(format!("Failed to serialize config: {e}")))?;
            std::fs::write(&output, toml)?;

            info!("Default configuration written to {:?}", output);
            Ok(())
        }
    }
}
