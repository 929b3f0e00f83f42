//! Diagnostics logging
//!
//! Events go to stderr so they never mix with grep output or `--show` output.

use std::io::IsTerminal;
use std::sync::OnceLock;

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter (e.g. `VCSGREP_LOG=debug`).
pub const LOG_ENV: &str = "VCSGREP_LOG";

static LOGGING: OnceLock<()> = OnceLock::new();

/// Install the global subscriber. Safe to call multiple times.
pub fn init() {
    LOGGING.get_or_init(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .with_target(false)
            .without_time()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
