use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive
pub(crate) const LOG_ENV: &str = "PUMPWATCH_LOG";

/// Install the stderr subscriber. `--debug` wins over `PUMPWATCH_LOG`.
pub(crate) fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("pumpwatch=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}
