//! Tracing subscriber setup for the runtime and its command line tool.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber. `RUST_LOG` selects the filter when set;
/// otherwise everything at `level` and above is logged.
///
/// Returns false if a global subscriber was already installed.
pub fn init(level: Level) -> bool {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}

fn env_filter(level: Level, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(level.as_str()))
}
