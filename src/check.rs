use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use crate::chat::ping_server;
use crate::telemetry::list_files;

/// Budget for the Ollama reachability ping
const CHECK_PING_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum CheckStatus {
    Ok,
    Info,
    Warn,
    Fail,
}

impl CheckStatus {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            CheckStatus::Ok => "ok",
            CheckStatus::Info => "info",
            CheckStatus::Warn => "warn",
            CheckStatus::Fail => "fail",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CheckItem {
    pub(crate) name: &'static str,
    pub(crate) status: CheckStatus,
    pub(crate) detail: String,
}

impl CheckItem {
    fn new(name: &'static str, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            name,
            status,
            detail: detail.into(),
        }
    }
}

/// Inputs to the readiness report
#[derive(Debug, Clone)]
pub(crate) struct CheckContext {
    pub(crate) work_dir: PathBuf,
    pub(crate) data_dir: PathBuf,
    pub(crate) config_source: Option<PathBuf>,
    pub(crate) api_key_present: bool,
    pub(crate) ollama_url: String,
}

fn check_data_dir(dir: &Path) -> CheckItem {
    let marker = dir.join(".pumpwatch-write-test");
    let result = fs::create_dir_all(dir)
        .and_then(|()| fs::write(&marker, b"ok"))
        .and_then(|()| fs::remove_file(&marker));
    match result {
        Ok(()) => CheckItem::new("data directory", CheckStatus::Ok, format!("{} is writable", dir.display())),
        Err(e) => CheckItem::new(
            "data directory",
            CheckStatus::Fail,
            format!("{} is not writable: {e}", dir.display()),
        ),
    }
}

fn check_telemetry(work_dir: &Path, data_dir: &Path) -> CheckItem {
    let mut files = list_files(work_dir, "csv");
    if data_dir != work_dir {
        files.extend(list_files(data_dir, "csv"));
    }
    if files.is_empty() {
        CheckItem::new(
            "telemetry CSV",
            CheckStatus::Warn,
            "none found; run `pumpwatch generate` or pass --input",
        )
    } else {
        let names: Vec<String> = files
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        CheckItem::new(
            "telemetry CSV",
            CheckStatus::Ok,
            format!("{} file(s): {}", files.len(), names.join(", ")),
        )
    }
}

fn check_reports(data_dir: &Path) -> CheckItem {
    let count = list_files(data_dir, "json").len();
    CheckItem::new(
        "analysis reports",
        CheckStatus::Info,
        format!("{count} report(s) in {}", data_dir.display()),
    )
}

fn check_config(source: Option<&Path>) -> CheckItem {
    let detail = match source {
        Some(path) => path.display().to_string(),
        None => "none (using defaults)".to_string(),
    };
    CheckItem::new("config file", CheckStatus::Info, detail)
}

fn check_api_key(present: bool) -> CheckItem {
    if present {
        CheckItem::new("OPENAI_API_KEY", CheckStatus::Ok, "set")
    } else {
        CheckItem::new(
            "OPENAI_API_KEY",
            CheckStatus::Warn,
            "not set; --llm-chatbot --provider openai will not work",
        )
    }
}

fn check_ollama(url: &str) -> CheckItem {
    match ping_server(url, CHECK_PING_TIMEOUT) {
        Ok(version) if version.is_empty() => {
            CheckItem::new("Ollama server", CheckStatus::Ok, format!("reachable at {url}"))
        }
        Ok(version) => CheckItem::new(
            "Ollama server",
            CheckStatus::Ok,
            format!("version {version} at {url}"),
        ),
        Err(e) => CheckItem::new("Ollama server", CheckStatus::Warn, e.to_string()),
    }
}

/// Readiness report; never starts a server
pub(crate) fn run_checks(ctx: &CheckContext) -> Vec<CheckItem> {
    let items = vec![
        check_data_dir(&ctx.data_dir),
        check_telemetry(&ctx.work_dir, &ctx.data_dir),
        check_reports(&ctx.data_dir),
        check_config(ctx.config_source.as_deref()),
        check_api_key(ctx.api_key_present),
        check_ollama(&ctx.ollama_url),
    ];
    for item in &items {
        tracing::debug!(check = item.name, status = item.status.as_str(), detail = %item.detail, "check");
    }
    items
}

pub(crate) fn failed_count(items: &[CheckItem]) -> usize {
    items.iter().filter(|i| i.status == CheckStatus::Fail).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed_port_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{port}")
    }

    #[test]
    fn fresh_workspace_warns_but_does_not_fail() {
        let work = tempfile::tempdir().unwrap();
        let ctx = CheckContext {
            work_dir: work.path().to_path_buf(),
            data_dir: work.path().join("water_pump_data"),
            config_source: None,
            api_key_present: false,
            ollama_url: closed_port_url(),
        };
        let items = run_checks(&ctx);
        assert_eq!(items.len(), 6);
        assert_eq!(failed_count(&items), 0);
        assert_eq!(items[0].status, CheckStatus::Ok);
        assert!(ctx.data_dir.is_dir());
        assert_eq!(items[1].status, CheckStatus::Warn);
        assert_eq!(items[4].status, CheckStatus::Warn);
        assert_eq!(items[5].status, CheckStatus::Warn);
    }

    #[test]
    fn csv_files_are_listed() {
        let work = tempfile::tempdir().unwrap();
        fs::write(work.path().join("pump.csv"), "timestamp,value\n").unwrap();
        let item = check_telemetry(work.path(), &work.path().join("data"));
        assert_eq!(item.status, CheckStatus::Ok);
        assert!(item.detail.contains("pump.csv"));
    }

    #[test]
    fn unwritable_data_dir_fails() {
        let work = tempfile::tempdir().unwrap();
        let blocker = work.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let item = check_data_dir(&blocker.join("sub"));
        assert_eq!(item.status, CheckStatus::Fail);
    }
}
