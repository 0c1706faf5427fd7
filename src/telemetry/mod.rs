//! Telemetry input: pump temperature readings and where to find them

mod csv;
mod discover;
mod types;

pub(crate) use csv::{load_csv, write_csv};
pub(crate) use discover::{InputSource, list_files, resolve_input};
pub(crate) use types::Reading;
