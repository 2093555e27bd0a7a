//! stderr logging via `tracing`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding `EnvFilter` directives, e.g. `PARATIDY_LOG=debug`.
pub const LOG_ENV: &str = "PARATIDY_LOG";

fn default_directive(debug: bool) -> &'static str {
    if debug { "paratidy=debug,warn" } else { "warn" }
}

/// Install the global subscriber. `PARATIDY_LOG` wins over `--debug`.
/// Calling this twice is harmless; the second call is ignored.
pub fn init(debug: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
