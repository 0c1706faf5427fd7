/// Folder that receives analysis reports, exports and the chat history database
pub(crate) const DEFAULT_DATA_DIR: &str = "water_pump_data";

/// Number of readings summarised per batch
pub(crate) const DEFAULT_WINDOW_SIZE: usize = 100;

/// Default output of `pumpwatch generate`
pub(crate) const DEFAULT_SAMPLE_FILE: &str = "sample_water_pump_data.csv";

/// Suffix format for timestamped artifacts: "20250115_093012"
pub(crate) const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Timestamp format written to generated CSV files
pub(crate) const CSV_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) const HISTORY_DB_FILE: &str = "chat_history.sqlite";

/// Batch-detail reference lines (°C)
pub(crate) const CAUTION_THRESHOLD: f64 = 70.0;
pub(crate) const DANGER_THRESHOLD: f64 = 85.0;

/// Default request timeout toward either LLM backend
pub(crate) const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

pub(crate) const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1-mini";
pub(crate) const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub(crate) const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub(crate) const DEFAULT_OLLAMA_MODEL: &str = "cogito:14b";
