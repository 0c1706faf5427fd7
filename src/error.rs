use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid analysis report {path}: {source}")]
    InvalidReport {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to parse config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Could not find timestamp and value columns in {input}")]
    MissingColumns { input: String },

    #[error("No telemetry readings in {input}")]
    NoReadings { input: String },

    #[error("Analysis report contains no batches")]
    EmptyReport,

    #[error("No telemetry data found. Run `pumpwatch generate` or pass --input <FILE>")]
    NoData,

    #[error("Window size must be at least 1")]
    InvalidWindowSize,

    #[error("Batch {id} not found (report has {total} batches)")]
    UnknownBatch { id: usize, total: usize },

    #[error("No LLM provider selected. Pass --provider openai or --provider ollama")]
    NoProvider,

    #[error("{failed} environment check(s) failed")]
    CheckFailed { failed: usize },

    #[error("Chat history store error: {0}")]
    History(#[from] rusqlite::Error),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Llm(#[from] LlmError),
}

#[derive(Debug, Error)]
pub(crate) enum LlmError {
    #[error("OpenAI API key is not set. Export OPENAI_API_KEY or pass --api-key")]
    MissingCredential,

    #[error("Invalid LLM configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot connect to {backend} at {url}: {detail}")]
    Unreachable {
        backend: &'static str,
        url: String,
        detail: String,
    },

    #[error("{backend} did not respond within {secs}s")]
    Timeout { backend: &'static str, secs: u64 },

    #[error("{backend} returned HTTP {status}{hint}")]
    Status {
        backend: &'static str,
        status: u16,
        hint: String,
    },

    #[error("Unexpected response from {backend}: {detail}")]
    MalformedResponse {
        backend: &'static str,
        detail: String,
    },
}

impl LlmError {
    /// True when the backend could not be reached at all (refused, DNS, timeout).
    pub(crate) fn is_connection_failure(&self) -> bool {
        matches!(self, LlmError::Unreachable { .. } | LlmError::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_error_display_unknown_batch() {
        let e = AppError::UnknownBatch { id: 9, total: 3 };
        assert_eq!(e.to_string(), "Batch 9 not found (report has 3 batches)");
    }

    #[test]
    fn app_error_display_missing_columns() {
        let e = AppError::MissingColumns {
            input: "pump.csv".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "Could not find timestamp and value columns in pump.csv"
        );
    }

    #[test]
    fn missing_credential_mentions_env_var() {
        assert!(LlmError::MissingCredential.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn status_error_appends_hint() {
        let e = LlmError::Status {
            backend: "Ollama",
            status: 404,
            hint: " (try `ollama pull mistral`)".to_string(),
        };
        assert_eq!(e.to_string(), "Ollama returned HTTP 404 (try `ollama pull mistral`)");
    }

    #[test]
    fn connection_failures_are_classified() {
        let unreachable = LlmError::Unreachable {
            backend: "Ollama",
            url: "http://127.0.0.1:1".to_string(),
            detail: "refused".to_string(),
        };
        assert!(unreachable.is_connection_failure());
        assert!(LlmError::Timeout { backend: "OpenAI", secs: 5 }.is_connection_failure());
        assert!(!LlmError::MissingCredential.is_connection_failure());
    }

    #[test]
    fn app_error_from_llm_error() {
        let app: AppError = LlmError::MissingCredential.into();
        assert!(app.to_string().starts_with("OpenAI API key is not set"));
    }
}
