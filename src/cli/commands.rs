//! CLI subcommand definitions
//!
//! The mode flags pick an interactive component; `generate` is the one subcommand.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Args, Subcommand};

use crate::consts::DEFAULT_SAMPLE_FILE;
use crate::generator::Scenario;
use crate::utils::parse_timestamp;

fn parse_start(raw: &str) -> Result<NaiveDateTime, String> {
    parse_timestamp(raw).ok_or_else(|| format!("invalid timestamp '{raw}' (expected YYYY-MM-DD HH:MM:SS)"))
}

/// Main CLI commands
#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Write synthetic pump telemetry to a CSV file
    Generate(GenerateArgs),
}

#[derive(Args, Debug, Clone)]
pub(crate) struct GenerateArgs {
    /// Temperature pattern to simulate
    #[arg(long, value_enum, default_value = "combined")]
    pub(crate) scenario: Scenario,

    /// Destination CSV file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_SAMPLE_FILE)]
    pub(crate) output: PathBuf,

    /// Hours of data to generate (ignored by the combined scenario)
    #[arg(long, value_name = "HOURS", default_value_t = 48,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) duration: u32,

    /// First timestamp [default: now minus the scenario span]
    #[arg(long, value_name = "TIMESTAMP", value_parser = parse_start)]
    pub(crate) start: Option<NaiveDateTime>,

    /// Seed for reproducible output (combine with --start for identical files)
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

/// Component selected by the mode flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Check,
    Chatbot,
    LlmChatbot,
    Dashboard,
    Analyzer,
}

impl Mode {
    /// Report-file prefix for analyses produced in this mode
    pub(crate) fn report_prefix(self, sample: bool) -> &'static str {
        match (self, sample) {
            (Mode::Analyzer, _) => "water_pump_analysis",
            (Mode::LlmChatbot, true) => "llm_sample_data_analysis",
            (Mode::LlmChatbot, false) => "llm_chatbot_analysis",
            (Mode::Chatbot, false) => "chatbot_analysis",
            (Mode::Dashboard, false) => "csv_analysis",
            (Mode::Chatbot | Mode::Dashboard | Mode::Check, true) => "sample_data_analysis",
            (Mode::Check, false) => "analysis",
        }
    }
}
