use std::time::Duration;

use super::backend::LlmBackend;
use super::ollama::OllamaBackend;
use super::openai::OpenAiBackend;
use crate::consts::{
    DEFAULT_LLM_TIMEOUT_SECS, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL, DEFAULT_OPENAI_BASE_URL,
    DEFAULT_OPENAI_MODEL,
};
use crate::error::LlmError;

/// Which kind of LLM service answers questions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BackendMode {
    /// OpenAI chat-completions API
    Hosted,
    /// Ollama server
    Local,
}

#[derive(Debug, Clone)]
pub(crate) struct BackendConfig {
    pub(crate) mode: BackendMode,
    pub(crate) api_key: Option<String>,
    pub(crate) openai_model: String,
    pub(crate) openai_base_url: String,
    pub(crate) ollama_url: String,
    pub(crate) ollama_model: String,
    pub(crate) timeout: Duration,
}

impl BackendConfig {
    pub(crate) fn new(mode: BackendMode) -> Self {
        Self {
            mode,
            api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
        }
    }
}

/// Build the backend for `config.mode`.
///
/// Only validates configuration; no request is sent. A hosted backend without
/// a non-blank API key fails with [`LlmError::MissingCredential`].
pub(crate) fn select_backend(config: &BackendConfig) -> Result<Box<dyn LlmBackend>, LlmError> {
    if config.timeout.is_zero() {
        return Err(LlmError::InvalidConfig("timeout must be at least 1 second".to_string()));
    }
    match config.mode {
        BackendMode::Hosted => {
            let key = config
                .api_key
                .as_deref()
                .filter(|k| !k.trim().is_empty())
                .ok_or(LlmError::MissingCredential)?;
            Ok(Box::new(OpenAiBackend::new(
                key,
                &config.openai_base_url,
                &config.openai_model,
                config.timeout,
            )?))
        }
        BackendMode::Local => Ok(Box::new(OllamaBackend::new(
            &config.ollama_url,
            &config.ollama_model,
            config.timeout,
        )?)),
    }
}
