use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::backend::{LlmBackend, build_agent, map_transport_error, normalize_base_url};
use crate::error::LlmError;

const BACKEND: &str = "Ollama";

/// Ping budget at session start
pub(crate) const PING_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

#[derive(Deserialize)]
struct VersionResponse {
    #[serde(default)]
    version: String,
}

/// Local model server speaking the Ollama HTTP API
pub(crate) struct OllamaBackend {
    agent: ureq::Agent,
    base_url: String,
    model: String,
    timeout_secs: u64,
}

impl OllamaBackend {
    pub(crate) fn new(url: &str, model: &str, timeout: Duration) -> Result<Self, LlmError> {
        let base_url = normalize_base_url(url, "Ollama URL")?;
        let model = model.trim();
        if model.is_empty() {
            return Err(LlmError::InvalidConfig("Ollama model name is empty".to_string()));
        }
        Ok(Self {
            agent: build_agent(timeout, &base_url),
            base_url,
            model: model.to_string(),
            timeout_secs: timeout.as_secs(),
        })
    }
}

/// `GET {url}/api/version`; returns the server version string
pub(crate) fn ping_server(url: &str, timeout: Duration) -> Result<String, LlmError> {
    let base_url = normalize_base_url(url, "Ollama URL")?;
    let endpoint = format!("{base_url}/api/version");
    let agent = build_agent(timeout, &base_url);
    let fail = |e| map_transport_error(e, BACKEND, &base_url, timeout.as_secs(), |_| String::new());

    let mut response = agent.get(&endpoint).call().map_err(fail)?;
    let body: VersionResponse = response.body_mut().read_json().map_err(fail)?;
    tracing::debug!(url = %base_url, version = %body.version, "ollama server reachable");
    Ok(body.version)
}

impl LlmBackend for OllamaBackend {
    fn name(&self) -> &'static str {
        BACKEND
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn check_ready(&self) -> Result<(), LlmError> {
        ping_server(&self.base_url, PING_TIMEOUT).map(|_| ())
    }

    fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let endpoint = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            system,
            stream: false,
        };
        let model = self.model.clone();
        let hint = move |status: u16| match status {
            404 => format!(" (model not installed? run `ollama pull {model}`)"),
            500..=599 => " (server error; check `ollama serve` logs)".to_string(),
            _ => String::new(),
        };

        tracing::debug!(model = %self.model, endpoint = %endpoint, "sending generate request");
        let mut response = self
            .agent
            .post(&endpoint)
            .send_json(&request)
            .map_err(|e| map_transport_error(e, BACKEND, &self.base_url, self.timeout_secs, hint))?;
        let body: GenerateResponse = response.body_mut().read_json().map_err(|e| {
            map_transport_error(e, BACKEND, &self.base_url, self.timeout_secs, |_| String::new())
        })?;

        body.response
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| LlmError::MalformedResponse {
                backend: BACKEND,
                detail: "missing `response` field".to_string(),
            })
    }
}
