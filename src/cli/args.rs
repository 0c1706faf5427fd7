//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgGroup, Parser, ValueEnum};

use crate::chat::{BackendConfig, BackendMode};
use crate::config::{Config, ConfigColorMode, ConfigProvider};
use crate::consts::{DEFAULT_DATA_DIR, DEFAULT_LLM_TIMEOUT_SECS, DEFAULT_WINDOW_SIZE};
use crate::error::AppError;

use super::commands::{Commands, Mode};

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub(crate) enum Provider {
    /// Hosted OpenAI chat-completions API (needs OPENAI_API_KEY)
    #[value(name = "openai")]
    OpenAi,
    /// Local Ollama server
    Ollama,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub(crate) enum ExportKind {
    /// Analysis report as JSON
    Json,
    /// Plain-text summary report
    Report,
    /// Both files
    All,
}

#[derive(Parser)]
#[command(name = "pumpwatch")]
#[command(about = "Water pump temperature analyzer, dashboard and chatbot", version)]
#[command(group(
    ArgGroup::new("mode")
        .args(["check", "chatbot", "llm_chatbot", "dashboard", "analyzer"])
        .multiple(false)
))]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Report environment readiness and exit
    #[arg(long)]
    pub(crate) check: bool,

    /// Rule-based chatbot (default)
    #[arg(long)]
    pub(crate) chatbot: bool,

    /// Chatbot backed by OpenAI or Ollama
    #[arg(long)]
    pub(crate) llm_chatbot: bool,

    /// Terminal dashboard
    #[arg(long)]
    pub(crate) dashboard: bool,

    /// Analyze telemetry and write a JSON report
    #[arg(long)]
    pub(crate) analyzer: bool,

    /// Telemetry CSV or analysis report (.json)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub(crate) input: Option<PathBuf>,

    /// Use built-in sample data
    #[arg(long, global = true, conflicts_with = "input")]
    pub(crate) sample: bool,

    /// Folder for reports, exports and chat history [default: water_pump_data]
    #[arg(long, global = true, value_name = "DIR")]
    pub(crate) data_dir: Option<PathBuf>,

    /// Readings per analysis batch [default: 100]
    #[arg(short, long, global = true, value_name = "N")]
    pub(crate) window_size: Option<usize>,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub(crate) debug: bool,

    /// Config file (skips the default search path)
    #[arg(long, global = true, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,

    /// Answer this question and exit (repeatable)
    #[arg(short = 'q', long = "query", value_name = "TEXT")]
    pub(crate) queries: Vec<String>,

    /// Persist chat messages to <data-dir>/chat_history.sqlite
    #[arg(long)]
    pub(crate) save_history: bool,

    /// LLM provider for --llm-chatbot
    #[arg(long, value_enum)]
    pub(crate) provider: Option<Provider>,

    /// Model name for the selected provider
    #[arg(long, value_name = "NAME")]
    pub(crate) model: Option<String>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, value_name = "KEY")]
    pub(crate) api_key: Option<String>,

    /// OpenAI-compatible API base URL [default: https://api.openai.com]
    #[arg(long, env = "OPENAI_BASE_URL", value_name = "URL")]
    pub(crate) openai_base_url: Option<String>,

    /// Ollama server URL [default: http://localhost:11434]
    #[arg(long, value_name = "URL")]
    pub(crate) ollama_url: Option<String>,

    /// LLM request timeout in seconds [default: 60]
    #[arg(long, value_name = "SECS")]
    pub(crate) timeout: Option<u64>,

    /// Show one batch in detail (dashboard)
    #[arg(long, value_name = "N")]
    pub(crate) batch: Option<usize>,

    /// Write dashboard exports to the data directory
    #[arg(long, value_enum)]
    pub(crate) export: Option<ExportKind>,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        // For boolean flags, config only applies if CLI is false (default)
        if !self.no_color && config.no_color {
            self.no_color = true;
        }
        if !self.debug && config.debug {
            self.debug = true;
        }
        if !self.save_history && config.save_history {
            self.save_history = true;
        }

        if let Some(color) = config.color
            && self.color == ColorMode::Auto
        {
            self.color = match color {
                ConfigColorMode::Auto => ColorMode::Auto,
                ConfigColorMode::Always => ColorMode::Always,
                ConfigColorMode::Never => ColorMode::Never,
            };
        }

        if self.provider.is_none() {
            self.provider = config.provider.map(|p| match p {
                ConfigProvider::Openai => Provider::OpenAi,
                ConfigProvider::Ollama => Provider::Ollama,
            });
        }

        // Option values: only apply if CLI didn't set them
        if self.data_dir.is_none() {
            self.data_dir = config.data_dir.clone();
        }
        if self.window_size.is_none() {
            self.window_size = config.window_size;
        }
        if self.openai_base_url.is_none() {
            self.openai_base_url = config.openai_base_url.clone();
        }
        if self.ollama_url.is_none() {
            self.ollama_url = config.ollama_url.clone();
        }
        if self.timeout.is_none() {
            self.timeout = config.timeout_secs;
        }

        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }

    /// Selected component; the rule-based chatbot when no flag is given
    pub(crate) fn mode(&self) -> Mode {
        if self.check {
            Mode::Check
        } else if self.llm_chatbot {
            Mode::LlmChatbot
        } else if self.dashboard {
            Mode::Dashboard
        } else if self.analyzer {
            Mode::Analyzer
        } else {
            Mode::Chatbot
        }
    }

    /// True when any mode flag was given explicitly
    pub(crate) fn has_mode_flag(&self) -> bool {
        self.check || self.chatbot || self.llm_chatbot || self.dashboard || self.analyzer
    }

    pub(crate) fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    pub(crate) fn window_size(&self) -> usize {
        self.window_size.unwrap_or(DEFAULT_WINDOW_SIZE)
    }

    pub(crate) fn api_key_present(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Backend settings for `--llm-chatbot`; errors when no provider is chosen
    pub(crate) fn backend_config(&self, config: &Config) -> Result<BackendConfig, AppError> {
        let mode = match self.provider {
            Some(Provider::OpenAi) => BackendMode::Hosted,
            Some(Provider::Ollama) => BackendMode::Local,
            None => return Err(AppError::NoProvider),
        };

        let mut backend = BackendConfig::new(mode);
        backend.api_key = self.api_key.clone();
        backend.timeout = Duration::from_secs(self.timeout.unwrap_or(DEFAULT_LLM_TIMEOUT_SECS));
        if let Some(url) = &self.openai_base_url {
            backend.openai_base_url = url.clone();
        }
        if let Some(url) = &self.ollama_url {
            backend.ollama_url = url.clone();
        }
        if let Some(model) = &config.openai_model {
            backend.openai_model = model.clone();
        }
        if let Some(model) = &config.ollama_model {
            backend.ollama_model = model.clone();
        }
        if let Some(model) = &self.model {
            match mode {
                BackendMode::Hosted => backend.openai_model = model.clone(),
                BackendMode::Local => backend.ollama_model = model.clone(),
            }
        }
        Ok(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pumpwatch").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn default_mode_is_chatbot() {
        assert_eq!(parse(&[]).mode(), Mode::Chatbot);
        assert_eq!(parse(&["--analyzer"]).mode(), Mode::Analyzer);
        assert_eq!(parse(&["--llm-chatbot"]).mode(), Mode::LlmChatbot);
    }

    #[test]
    fn two_mode_flags_conflict() {
        let err = Cli::try_parse_from(["pumpwatch", "--chatbot", "--dashboard"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn config_fills_unset_values_only() {
        let config = Config {
            data_dir: Some(PathBuf::from("cfg_dir")),
            window_size: Some(25),
            provider: Some(ConfigProvider::Ollama),
            save_history: true,
            ..Config::default()
        };
        let cli = parse(&["--window-size", "10"]).with_config(&config);
        assert_eq!(cli.data_dir(), PathBuf::from("cfg_dir"));
        assert_eq!(cli.window_size(), 10);
        assert_eq!(cli.provider, Some(Provider::Ollama));
        assert!(cli.save_history);
    }

    #[test]
    fn backend_config_requires_provider() {
        let cli = parse(&["--llm-chatbot"]);
        assert!(matches!(
            cli.backend_config(&Config::default()),
            Err(AppError::NoProvider)
        ));
    }

    #[test]
    fn model_flag_targets_selected_provider() {
        let config = Config {
            openai_model: Some("gpt-cfg".to_string()),
            ..Config::default()
        };
        let cli = parse(&["--provider", "ollama", "--model", "mistral", "--timeout", "5"]);
        let backend = cli.backend_config(&config).unwrap();
        assert_eq!(backend.mode, BackendMode::Local);
        assert_eq!(backend.ollama_model, "mistral");
        assert_eq!(backend.openai_model, "gpt-cfg");
        assert_eq!(backend.timeout, Duration::from_secs(5));
    }

    #[test]
    fn no_color_wins() {
        let cli = parse(&["--color", "always", "--no-color"]);
        assert!(!cli.use_color());
        assert!(parse(&["--color", "always"]).use_color());
    }
}
