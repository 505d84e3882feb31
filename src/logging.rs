//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a full filter directive.
pub const LOG_ENV: &str = "SHEETCHECK_LOG";

/// Picks the filter directive: `--verbose` forces `debug`, then `SHEETCHECK_LOG`,
/// then the configured level.
#[must_use]
pub fn filter_directive(verbose: bool, from_env: Option<String>, configured: &str) -> String {
    if verbose {
        return "debug".to_string();
    }
    from_env.filter(|d| !d.trim().is_empty()).unwrap_or_else(|| configured.to_string())
}

/// Installs the stderr subscriber once per process; later calls are no-ops.
pub fn init(verbose: bool, configured: &str) {
    let directive = filter_directive(verbose, std::env::var(LOG_ENV).ok(), configured);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
