use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigProvider {
    Openai,
    Ollama,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) data_dir: Option<PathBuf>,
    #[serde(default)]
    pub(crate) window_size: Option<usize>,
    #[serde(default)]
    pub(crate) provider: Option<ConfigProvider>,
    #[serde(default)]
    pub(crate) openai_model: Option<String>,
    #[serde(default)]
    pub(crate) openai_base_url: Option<String>,
    #[serde(default)]
    pub(crate) ollama_url: Option<String>,
    #[serde(default)]
    pub(crate) ollama_model: Option<String>,
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    #[serde(default)]
    pub(crate) save_history: bool,
    #[serde(default)]
    pub(crate) no_color: bool,
    #[serde(default)]
    pub(crate) color: Option<ConfigColorMode>,
    #[serde(default)]
    pub(crate) debug: bool,

    /// File the values came from
    #[serde(skip)]
    pub(crate) source: Option<PathBuf>,
    /// Search-path files that failed to parse, reported once logging is up
    #[serde(skip)]
    pub(crate) warnings: Vec<String>,
}

impl Config {
    /// Load `explicit` (errors are fatal) or the first parseable file on the search path
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self, AppError> {
        if let Some(path) = explicit {
            let content = fs::read_to_string(path).map_err(|source| AppError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let mut config = Self::parse(&content, path)?;
            config.source = Some(path.to_path_buf());
            return Ok(config);
        }

        let mut warnings = Vec::new();
        for path in Self::get_config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match Self::parse(&content, &path) {
                    Ok(mut config) => {
                        config.source = Some(path);
                        config.warnings = warnings;
                        return Ok(config);
                    }
                    Err(e) => warnings.push(format!("Skipping config: {e}")),
                }
            }
        }

        Ok(Self {
            warnings,
            ..Self::default()
        })
    }

    fn parse(content: &str, path: &Path) -> Result<Self, AppError> {
        toml::from_str::<Config>(content).map_err(|e| AppError::Config {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/pumpwatch/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("pumpwatch").join("config.toml"));
        }

        // 2. Platform config dir (e.g. ~/Library/Application Support on macOS)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("pumpwatch").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.pumpwatch.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".pumpwatch.toml"));
        }

        paths
    }
}
