use std::fmt::Write;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::backend::LlmBackend;
use super::context::{SYSTEM_PROMPT, build_prompt};
use super::history::{HistoryStore, StoredMessage};
use super::rules;
use crate::analysis::{AnalysisReport, ReportSummary};
use crate::error::AppError;
use crate::utils::{file_stamp, now_local};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    User,
    Assistant,
}

impl Role {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Anything other than "user" is read back as assistant
    pub(crate) fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("user") {
            Role::User
        } else {
            Role::Assistant
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ChatMessage {
    pub(crate) role: Role,
    pub(crate) content: String,
    pub(crate) timestamp: NaiveDateTime,
}

impl ChatMessage {
    fn now(role: Role, content: &str) -> Self {
        Self {
            role,
            content: content.to_string(),
            timestamp: now_local(),
        }
    }
}

/// Produces answers about one analysis report
pub(crate) trait Responder {
    /// Provider tag shown in the welcome text and stored with history
    fn provider(&self) -> String;

    fn summary(&self) -> &ReportSummary;

    fn respond(&self, question: &str) -> Result<String, AppError>;
}

/// Keyword rule engine, no network
pub(crate) struct RuleResponder {
    report: AnalysisReport,
    summary: ReportSummary,
}

impl RuleResponder {
    pub(crate) fn new(report: AnalysisReport) -> Result<Self, AppError> {
        let summary = ReportSummary::from_report(&report)?;
        Ok(Self { report, summary })
    }
}

impl Responder for RuleResponder {
    fn provider(&self) -> String {
        "rules".to_string()
    }

    fn summary(&self) -> &ReportSummary {
        &self.summary
    }

    fn respond(&self, question: &str) -> Result<String, AppError> {
        Ok(rules::answer(&self.report, &self.summary, question))
    }
}

/// Forwards each question plus the analysis context to an LLM backend
pub(crate) struct LlmResponder {
    backend: Box<dyn LlmBackend>,
    report: AnalysisReport,
    summary: ReportSummary,
}

impl LlmResponder {
    pub(crate) fn new(backend: Box<dyn LlmBackend>, report: AnalysisReport) -> Result<Self, AppError> {
        let summary = ReportSummary::from_report(&report)?;
        Ok(Self {
            backend,
            report,
            summary,
        })
    }
}

impl Responder for LlmResponder {
    fn provider(&self) -> String {
        format!("{} ({})", self.backend.name(), self.backend.model())
    }

    fn summary(&self) -> &ReportSummary {
        &self.summary
    }

    fn respond(&self, question: &str) -> Result<String, AppError> {
        let prompt = build_prompt(&self.report, &self.summary, question);
        tracing::debug!(backend = self.backend.name(), prompt_len = prompt.len(), "asking LLM");
        Ok(self.backend.complete(SYSTEM_PROMPT, &prompt)?)
    }
}

/// A conversation: in-memory transcript, optionally mirrored to SQLite
pub(crate) struct ChatSession {
    responder: Box<dyn Responder>,
    messages: Vec<ChatMessage>,
    history: Option<HistoryStore>,
    session_id: String,
}

impl ChatSession {
    pub(crate) fn new(responder: Box<dyn Responder>) -> Self {
        Self {
            responder,
            messages: Vec::new(),
            history: None,
            session_id: format!("{}-{}", file_stamp(now_local()), std::process::id()),
        }
    }

    pub(crate) fn with_history(mut self, store: HistoryStore) -> Self {
        self.history = Some(store);
        self
    }

    pub(crate) fn welcome(&self) -> String {
        let summary = self.responder.summary();
        let mut out = String::new();
        let _ = writeln!(out, "Water pump assistant [{}]", self.responder.provider());
        let _ = writeln!(
            out,
            "Loaded {} batches ({} ~ {}), {} at warning or danger level.",
            summary.total_batches,
            summary.period_start.format("%Y-%m-%d %H:%M"),
            summary.period_end.format("%Y-%m-%d %H:%M"),
            summary.critical_batches.len()
        );
        let _ = write!(out, "Ask a question, or type /help for commands.");
        out
    }

    /// Record the question, get an answer, record the answer.
    ///
    /// A failed answer leaves the question in the transcript and returns the error.
    pub(crate) fn ask(&mut self, question: &str) -> Result<String, AppError> {
        self.record(ChatMessage::now(Role::User, question));
        let answer = self.responder.respond(question)?;
        self.record(ChatMessage::now(Role::Assistant, &answer));
        Ok(answer)
    }

    fn record(&mut self, message: ChatMessage) {
        if let Some(store) = &self.history
            && let Err(e) = store.append(&self.session_id, &self.responder.provider(), &message)
        {
            tracing::warn!(error = %e, "failed to persist chat message");
        }
        self.messages.push(message);
    }

    pub(crate) fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub(crate) fn transcript(&self) -> String {
        if self.messages.is_empty() {
            return "No messages yet.".to_string();
        }
        let mut out = String::new();
        for m in &self.messages {
            let _ = writeln!(
                out,
                "[{}] {}: {}",
                m.timestamp.format("%H:%M:%S"),
                m.role.as_str(),
                m.content.trim_end()
            );
        }
        out
    }

    /// Messages stored by earlier sessions, when persistence is enabled
    pub(crate) fn saved(&self, limit: usize) -> Option<Result<Vec<StoredMessage>, AppError>> {
        self.history
            .as_ref()
            .map(|store| store.earlier(&self.session_id, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{DataSource, analyze_batches};
    use crate::error::LlmError;
    use crate::telemetry::Reading;
    use chrono::{Duration, NaiveDate};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn report() -> AnalysisReport {
        let start = NaiveDate::from_ymd_opt(2025, 8, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let readings: Vec<Reading> = [50.0, 51.0, 88.0, 95.0]
            .iter()
            .enumerate()
            .map(|(i, &value)| Reading {
                timestamp: start + Duration::minutes(10 * i as i64),
                value,
            })
            .collect();
        AnalysisReport::new(analyze_batches(&readings, 2).unwrap(), 2, DataSource::SampleData)
    }

    struct FakeBackend {
        prompts: Rc<RefCell<Vec<(String, String)>>>,
        fail: bool,
    }

    impl LlmBackend for FakeBackend {
        fn name(&self) -> &'static str {
            "Fake"
        }

        fn model(&self) -> &str {
            "fake-1"
        }

        fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
            self.prompts
                .borrow_mut()
                .push((system.to_string(), prompt.to_string()));
            if self.fail {
                Err(LlmError::Timeout { backend: "Fake", secs: 1 })
            } else {
                Ok("all good".to_string())
            }
        }
    }

    #[test]
    fn rule_session_records_both_sides() {
        let mut session = ChatSession::new(Box::new(RuleResponder::new(report()).unwrap()));
        assert!(session.welcome().contains("[rules]"));
        assert!(session.welcome().contains("Loaded 2 batches"));

        let answer = session.ask("overall status").unwrap();
        assert!(answer.contains("Water pump temperature overview"));
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[0].role, Role::User);
        assert!(session.transcript().contains("user: overall status"));
    }

    #[test]
    fn llm_responder_sends_context() {
        let prompts = Rc::new(RefCell::new(Vec::new()));
        let backend = FakeBackend {
            prompts: Rc::clone(&prompts),
            fail: false,
        };
        let responder = LlmResponder::new(Box::new(backend), report()).unwrap();
        assert_eq!(responder.provider(), "Fake (fake-1)");
        assert_eq!(responder.respond("why hot?").unwrap(), "all good");

        let sent = prompts.borrow();
        assert_eq!(sent[0].0, SYSTEM_PROMPT);
        assert!(sent[0].1.contains("## Alert level distribution"));
        assert!(sent[0].1.contains("why hot?"));
    }

    #[test]
    fn failed_answer_keeps_question_only() {
        let backend = FakeBackend {
            prompts: Rc::default(),
            fail: true,
        };
        let mut session =
            ChatSession::new(Box::new(LlmResponder::new(Box::new(backend), report()).unwrap()));
        let err = session.ask("why hot?").unwrap_err();
        assert!(matches!(err, AppError::Llm(LlmError::Timeout { .. })));
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn empty_report_is_rejected() {
        let empty = AnalysisReport::new(Vec::new(), 100, DataSource::CsvFile);
        assert!(matches!(RuleResponder::new(empty), Err(AppError::EmptyReport)));
    }

    #[test]
    fn session_persists_to_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.sqlite");
        let mut first = ChatSession::new(Box::new(RuleResponder::new(report()).unwrap()))
            .with_history(HistoryStore::open(&path).unwrap());
        first.ask("any risk?").unwrap();
        assert!(first.saved(10).unwrap().unwrap().is_empty());

        let mut second = ChatSession::new(Box::new(RuleResponder::new(report()).unwrap()))
            .with_history(HistoryStore::open(&path).unwrap());
        second.session_id = "second".to_string();
        second.ask("status?").unwrap();

        let saved = second.saved(10).unwrap().unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].provider, "rules");
        assert_eq!(saved[0].message.content, "any risk?");
        assert_eq!(saved[1].message.role, Role::Assistant);
    }

    #[test]
    fn role_round_trip() {
        assert_eq!(Role::parse("USER"), Role::User);
        assert_eq!(Role::parse(Role::Assistant.as_str()), Role::Assistant);
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }
}
