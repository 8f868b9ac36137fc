//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Stackpeek - explain a backend project from its archive
///
/// Upload a project ZIP to an analyzer service and render what it found:
/// languages, frameworks, API routes, entry points, build info, and
/// security/data-layer findings.
///
/// Examples:
///   stackpeek project.zip
///   stackpeek project.zip --format markdown --output analysis.md
///   stackpeek project.zip --api-url https://analyzer.internal/api/explain
///   stackpeek --health
///   stackpeek --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the project archive (.zip) to analyze
    #[arg(
        value_name = "ARCHIVE",
        required_unless_present_any = ["init_config", "health"]
    )]
    pub archive: Option<PathBuf>,

    /// Analyzer API base URL
    ///
    /// Can also be set via STACKPEEK_API_URL env var or .stackpeek.toml config.
    #[arg(short = 'u', long, value_name = "URL", env = "STACKPEEK_API_URL")]
    pub api_url: Option<String>,

    /// Output file path for the report (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (text, markdown, json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Request timeout in seconds
    ///
    /// How long to wait for the analyzer. Large archives can take a few
    /// minutes. Default: from config or 120s.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Maximum rows shown per report section
    ///
    /// Longer collections are truncated with a "+N more" marker. Truncation
    /// is presentation only; --format json always carries everything.
    #[arg(long, value_name = "COUNT")]
    pub max_items: Option<usize>,

    /// Print the raw analyzer response as pretty JSON and exit
    #[arg(long)]
    pub raw: bool,

    /// Probe the analyzer health endpoint and exit
    #[arg(long)]
    pub health: bool,

    /// Exit with code 2 when the analyzer detected nothing
    ///
    /// Useful for CI pipelines that treat an empty result as a failure.
    #[arg(long)]
    pub fail_on_empty: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .stackpeek.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .stackpeek.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text for the terminal (default)
    #[default]
    Text,
    /// Markdown format
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Validate the archive unless we're only probing health
        if !self.health {
            let archive = self
                .archive
                .as_ref()
                .ok_or_else(|| "An archive path is required".to_string())?;

            if !archive.exists() {
                return Err(format!("Archive does not exist: {}", archive.display()));
            }
            if !archive.is_file() {
                return Err(format!("Archive is not a file: {}", archive.display()));
            }

            let is_zip = archive
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("zip"))
                .unwrap_or(false);
            if !is_zip {
                return Err("Only ZIP archives are accepted".to_string());
            }
        }

        // Validate the API URL format when given on the command line
        if let Some(ref url) = self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Analyzer URL must start with 'http://' or 'https://'".to_string());
            }
        }

        // Validate timeout if provided
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
