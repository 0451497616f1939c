//! Command-line interface
//!
//! `breathe [TECHNIQUE] [-c N] [--no-audio] [--config PATH]` opens the
//! visualizer; `breathe list [--json]` prints the catalog and exits.

use std::path::PathBuf;

use breathe_engine::config::{self, BreatheConfig, ConfigError, ConfigOverrides};
use breathe_engine::{catalog, ConfigurationError, EngineError, TechniquePattern};
use clap::{Parser, Subcommand};

/// Exit code for bad technique names, cycle counts and config files
pub const EXIT_CONFIGURATION: u8 = 2;
/// Exit code for terminal and I/O failures
pub const EXIT_RUNTIME: u8 = 1;

#[derive(Debug, Parser)]
#[command(name = "breathe", version, about = "Guided breathing in your terminal")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Technique to start right away, skipping the menu (see `breathe list`)
    pub technique: Option<String>,

    /// Number of cycles for the technique given on the command line
    #[arg(short, long, requires = "technique", allow_negative_numbers = true)]
    pub cycles: Option<i64>,

    /// Start with sound cues off
    #[arg(long)]
    pub no_audio: bool,

    /// Configuration file (default: ~/.config/breathe/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the available techniques
    List {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Everything the visualizer needs, resolved from the command line
#[derive(Debug)]
pub struct Launch {
    pub config: BreatheConfig,
    pub technique: Option<&'static TechniquePattern>,
    pub cycles: Option<u32>,
}

impl Cli {
    /// Load configuration and resolve the technique and cycle arguments
    pub fn resolve(&self) -> Result<Launch, EngineError> {
        let env = |key: &str| std::env::var(key).ok();
        self.resolve_with(env)
    }

    /// [`Cli::resolve`] with an injected environment lookup
    pub fn resolve_with<E>(&self, env: E) -> Result<Launch, EngineError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let mut config = match &self.config {
            Some(path) => config::load_config_from_path(Some(path.as_path()), true, env)?,
            None => config::load_config_from_path(config::default_config_path().as_deref(), false, env)?,
        };

        let mut overrides = ConfigOverrides::new();
        if self.no_audio {
            overrides = overrides.with_audio_enabled(false);
        }
        overrides.apply(&mut config)?;

        let technique = self.technique.as_deref().map(catalog::lookup).transpose()?;
        let cycles = self
            .cycles
            .map(|c| config.validate_cycles(c))
            .transpose()?;

        Ok(Launch {
            config,
            technique,
            cycles,
        })
    }
}

/// Process exit code for an error
#[must_use]
pub fn exit_code(error: &EngineError) -> u8 {
    if error.is_configuration() {
        EXIT_CONFIGURATION
    } else {
        EXIT_RUNTIME
    }
}

/// Message printed to stderr for an error, with a hint on how to fix it
#[must_use]
pub fn describe(error: &EngineError) -> String {
    match error {
        EngineError::Configuration(ConfigurationError::Catalog(_)) => {
            format!("breathe: {error}\nRun `breathe list` to see every technique.")
        }
        EngineError::Configuration(ConfigurationError::Config(ConfigError::InvalidCycles {
            ..
        })) => format!("breathe: {error}"),
        EngineError::Configuration(ConfigurationError::Config(_)) => format!(
            "breathe: {error}\nCheck the file passed with --config or {}.",
            config::default_config_path()
                .map_or_else(|| "the default config file".to_string(), |p| p.display().to_string())
        ),
        _ => format!("breathe: {error}"),
    }
}
