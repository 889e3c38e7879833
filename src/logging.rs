//! Diagnostic logging to stderr

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV: &str = "AEROCODE_LOG";

/// Install the global subscriber
///
/// `AEROCODE_LOG` wins when set; otherwise only warnings are shown, or
/// everything from debug up with `--verbose`. Calling this twice is harmless.
pub fn init(verbose: bool) {
    let fallback = if verbose { "aerocode=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
