//! Question answering over an analysis report: rule engine or LLM backends

mod backend;
mod context;
mod history;
mod ollama;
mod openai;
mod repl;
mod rules;
mod selector;
mod session;

pub(crate) use history::HistoryStore;
pub(crate) use ollama::ping_server;
pub(crate) use repl::{run_interactive, run_queries};
pub(crate) use selector::{BackendConfig, BackendMode, select_backend};
pub(crate) use session::{ChatSession, LlmResponder, RuleResponder};
