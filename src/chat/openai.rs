use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::backend::{LlmBackend, build_agent, map_transport_error, normalize_base_url};
use crate::error::LlmError;

const BACKEND: &str = "OpenAI";
const MAX_TOKENS: u32 = 1500;
const TEMPERATURE: f64 = 0.7;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [WireMessage<'a>; 2],
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Hosted chat-completions API
pub(crate) struct OpenAiBackend {
    agent: ureq::Agent,
    endpoint: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl OpenAiBackend {
    pub(crate) fn new(
        api_key: &str,
        base_url: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(LlmError::MissingCredential);
        }
        let model = model.trim();
        if model.is_empty() {
            return Err(LlmError::InvalidConfig("OpenAI model name is empty".to_string()));
        }
        let base = normalize_base_url(base_url, "OpenAI base URL")?;
        let endpoint = format!("{base}/v1/chat/completions");

        Ok(Self {
            agent: build_agent(timeout, &base),
            endpoint,
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout_secs: timeout.as_secs(),
        })
    }
}

fn status_hint(status: u16) -> String {
    match status {
        401 | 403 => " (check that OPENAI_API_KEY is valid)".to_string(),
        404 => " (unknown model or endpoint; check --model and OPENAI_BASE_URL)".to_string(),
        429 => " (rate limit or quota exceeded; check your account balance)".to_string(),
        500..=599 => " (server error; try again later)".to_string(),
        _ => String::new(),
    }
}

impl LlmBackend for OpenAiBackend {
    fn name(&self) -> &'static str {
        BACKEND
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                WireMessage {
                    role: "system",
                    content: system,
                },
                WireMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        tracing::debug!(model = %self.model, endpoint = %self.endpoint, "sending chat completion");
        let fail = |e| map_transport_error(e, BACKEND, &self.endpoint, self.timeout_secs, status_hint);

        let mut response = self
            .agent
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send_json(&request)
            .map_err(fail)?;
        let body: ChatResponse = response.body_mut().read_json().map_err(fail)?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| LlmError::MalformedResponse {
                backend: BACKEND,
                detail: "no message content in choices[0]".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_key_is_missing_credential() {
        let err = OpenAiBackend::new("  ", "https://api.openai.com", "gpt-4.1-mini", Duration::from_secs(5))
            .err()
            .unwrap();
        assert!(matches!(err, LlmError::MissingCredential));
    }

    #[test]
    fn endpoint_is_built_from_base_url() {
        let backend =
            OpenAiBackend::new("sk-test", "http://127.0.0.1:9/", "gpt-4.1-mini", Duration::from_secs(5))
                .unwrap();
        assert_eq!(backend.endpoint, "http://127.0.0.1:9/v1/chat/completions");
        assert_eq!(backend.model(), "gpt-4.1-mini");
    }

    #[test]
    fn request_wire_shape() {
        let request = ChatRequest {
            model: "m",
            messages: [
                WireMessage { role: "system", content: "s" },
                WireMessage { role: "user", content: "u" },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["max_tokens"], 1500);
        assert_eq!(value["temperature"], 0.7);
    }

    #[test]
    fn response_without_content_parses() {
        let body: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant"}}]}"#).unwrap();
        assert!(body.choices[0].message.content.is_none());
    }

    #[test]
    fn hints_by_status() {
        assert!(status_hint(401).contains("OPENAI_API_KEY"));
        assert!(status_hint(418).is_empty());
    }
}
