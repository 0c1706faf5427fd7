use std::time::Duration;

use crate::error::LlmError;

/// A text-completion service the LLM chatbot can forward questions to
pub(crate) trait LlmBackend {
    /// Human-readable backend name used in messages ("OpenAI", "Ollama")
    fn name(&self) -> &'static str;

    fn model(&self) -> &str;

    /// Verify the backend can serve requests before a session starts
    fn check_ready(&self) -> Result<(), LlmError> {
        Ok(())
    }

    fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError>;
}

/// Agent with a global timeout. Loopback URLs bypass any environment proxy.
pub(super) fn build_agent(timeout: Duration, url: &str) -> ureq::Agent {
    let mut builder = ureq::Agent::config_builder().timeout_global(Some(timeout));
    if is_loopback_url(url) {
        builder = builder.proxy(None);
    }
    builder.build().into()
}

pub(super) fn is_loopback_url(url: &str) -> bool {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split('/').next().unwrap_or(rest);
    let authority = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    let host = if let Some(bracketed) = authority.strip_prefix('[') {
        bracketed.split(']').next().unwrap_or(bracketed)
    } else {
        authority.split(':').next().unwrap_or(authority)
    };
    host.eq_ignore_ascii_case("localhost") || host.starts_with("127.") || host == "::1"
}

/// Require an absolute http(s) URL without a trailing slash
pub(super) fn normalize_base_url(raw: &str, what: &str) -> Result<String, LlmError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(LlmError::InvalidConfig(format!("{what} is empty")));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(LlmError::InvalidConfig(format!(
            "{what} must start with http:// or https:// (got {trimmed})"
        )));
    }
    Ok(trimmed.to_string())
}

/// Translate a ureq failure into the chatbot's error taxonomy
pub(super) fn map_transport_error(
    err: ureq::Error,
    backend: &'static str,
    url: &str,
    timeout_secs: u64,
    hint: impl FnOnce(u16) -> String,
) -> LlmError {
    match err {
        ureq::Error::StatusCode(status) => LlmError::Status {
            backend,
            status,
            hint: hint(status),
        },
        ureq::Error::Timeout(_) => LlmError::Timeout {
            backend,
            secs: timeout_secs,
        },
        ureq::Error::Io(e) if e.kind() == std::io::ErrorKind::TimedOut => LlmError::Timeout {
            backend,
            secs: timeout_secs,
        },
        ureq::Error::Json(e) => LlmError::MalformedResponse {
            backend,
            detail: e.to_string(),
        },
        ureq::Error::BadUri(detail) => {
            LlmError::InvalidConfig(format!("invalid {backend} URL {url}: {detail}"))
        }
        ureq::Error::Io(e) => LlmError::Unreachable {
            backend,
            url: url.to_string(),
            detail: e.to_string(),
        },
        ureq::Error::HostNotFound => LlmError::Unreachable {
            backend,
            url: url.to_string(),
            detail: "host not found".to_string(),
        },
        ureq::Error::ConnectionFailed => LlmError::Unreachable {
            backend,
            url: url.to_string(),
            detail: "connection failed".to_string(),
        },
        other => LlmError::Unreachable {
            backend,
            url: url.to_string(),
            detail: other.to_string(),
        },
    }
}
