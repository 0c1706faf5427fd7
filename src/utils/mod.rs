pub(crate) mod date;
pub(crate) mod logging;

pub(crate) use date::{file_stamp, now_local, parse_timestamp};
pub(crate) use logging::init_logging;
