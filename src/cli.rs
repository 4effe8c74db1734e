//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::Tone;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// TextGuard - AI text detection and humanization
///
/// Score a message for AI-vs-human markers, rewrite it in a chosen tone,
/// and keep an on-device history of every run.
///
/// Examples:
///   textguard analyze "Furthermore, it is important to note that..."
///   textguard analyze --file essay.docx
///   pbpaste | textguard analyze -
///   textguard humanize --tone casual --file cover_letter.pdf
///   textguard humanize --from 3f2c9a1e-... --tone academic
///   textguard history --format json
///   textguard init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Gemini model to use
    ///
    /// Can also be set via TEXTGUARD_MODEL env var or .textguard.toml config.
    #[arg(short, long, global = true, env = "TEXTGUARD_MODEL")]
    pub model: Option<String>,

    /// Gemini API base URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Gemini API key
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .textguard.toml in the current directory
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding history and progress
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, global = true, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the rendered view to a file instead of stdout
    #[arg(short, long, global = true, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Temperature for model responses (0.0 - 2.0)
    #[arg(long, global = true)]
    pub temperature: Option<f32>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Subcommands, one per user action.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Analyze text for AI-vs-human markers
    Analyze {
        /// Text to analyze ("-" reads stdin)
        #[arg(conflicts_with = "file")]
        text: Option<String>,

        /// Read the text from a PDF, DOCX or TXT file
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Rewrite text so it reads as human-written
    ///
    /// The text is analyzed first unless --from restores a saved record.
    Humanize {
        /// Text to humanize ("-" reads stdin)
        #[arg(conflicts_with_all = ["file", "from"])]
        text: Option<String>,

        /// Read the text from a PDF, DOCX or TXT file
        #[arg(short, long, value_name = "FILE", conflicts_with = "from")]
        file: Option<PathBuf>,

        /// Reuse the text and analysis of a history record
        #[arg(long, value_name = "ID")]
        from: Option<String>,

        /// Target tone (defaults to the configured tone)
        #[arg(short, long)]
        tone: Option<Tone>,
    },

    /// List saved analyses, newest first
    History,

    /// Re-open a saved record
    Show {
        /// Record id
        id: String,
    },

    /// Delete a saved record
    Delete {
        /// Record id
        id: String,
    },

    /// Show onboarding missions
    Progress,

    /// Generate a default .textguard.toml configuration file
    InitConfig,
}

/// Output format for rendered views.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// Where the input text comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    Inline(String),
    Stdin,
    File(PathBuf),
    Record(String),
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Input source of an analyze or humanize command.
    pub fn input_source(&self) -> Option<InputSource> {
        match &self.command {
            Command::Analyze { text, file } => source_of(text, file, &None),
            Command::Humanize {
                text, file, from, ..
            } => source_of(text, file, from),
            _ => None,
        }
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for init-config
        if matches!(self.command, Command::InitConfig) {
            return Ok(());
        }

        // Analyze and humanize need something to work on
        if matches!(
            self.command,
            Command::Analyze { .. } | Command::Humanize { .. }
        ) && self.input_source().is_none()
        {
            return Err("Provide text, --file or --from".to_string());
        }

        if let Some(InputSource::File(ref path)) = self.input_source() {
            if !path.is_file() {
                return Err(format!("File does not exist: {}", path.display()));
            }
        }

        // Validate API URL format
        if let Some(ref url) = self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        // Validate temperature range
        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err("Temperature must be between 0.0 and 2.0".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Validate timeout if provided
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
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

fn source_of(
    text: &Option<String>,
    file: &Option<PathBuf>,
    from: &Option<String>,
) -> Option<InputSource> {
    if let Some(id) = from {
        return Some(InputSource::Record(id.clone()));
    }
    if let Some(path) = file {
        return Some(InputSource::File(path.clone()));
    }
    match text.as_deref() {
        Some("-") => Some(InputSource::Stdin),
        Some(t) if !t.trim().is_empty() => Some(InputSource::Inline(t.to_string())),
        _ => None,
    }
}
