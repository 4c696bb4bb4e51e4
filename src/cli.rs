//! Command-line argument parsing for querylens.

use crate::config::{Config, Overrides};
use clap::Parser;
use std::path::PathBuf;

/// Output format for one-shot mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable sections.
    #[default]
    Text,
    /// The rendered sections as JSON.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {s}. Expected: text or json")),
        }
    }
}

/// How the process should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Interactive terminal UI.
    Interactive,
    /// Submit once and print the result.
    Once,
    /// Check that the service is reachable.
    Check,
}

/// Ask a database questions in plain language.
#[derive(Parser, Debug)]
#[command(name = "querylens")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Database URL passed to the query service
    #[arg(short = 'd', long, value_name = "URL")]
    pub database_url: Option<String>,

    /// Natural-language prompt
    #[arg(short = 'p', long, value_name = "PROMPT")]
    pub prompt: Option<String>,

    /// Query service endpoint (e.g., http://localhost:8000/api/query)
    #[arg(short = 'e', long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Submit once, print the result and exit
    #[arg(long)]
    pub once: bool,

    /// Check that the query service is reachable and exit
    #[arg(long, conflicts_with = "once")]
    pub check: bool,

    /// Output format for one-shot mode
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub output: String,

    /// Use the built-in mock service instead of the network
    #[arg(long)]
    pub mock: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Values that take precedence over the environment and config file.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            endpoint: self.endpoint.clone(),
            timeout_secs: self.timeout,
            database_url: self.database_url.clone(),
        }
    }

    /// Decides the run mode.
    ///
    /// Giving both the database URL and the prompt implies `--once`.
    pub fn run_mode(&self) -> RunMode {
        if self.check {
            RunMode::Check
        } else if self.once || (self.database_url.is_some() && self.prompt.is_some()) {
            RunMode::Once
        } else {
            RunMode::Interactive
        }
    }

    /// Parses the output format from the --output argument.
    pub fn parse_output_format(&self) -> std::result::Result<OutputFormat, String> {
        self.output.parse()
    }
}
