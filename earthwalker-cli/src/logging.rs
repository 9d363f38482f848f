//! Log output for the CLI.
//!
//! Library crates log through the `log` facade; the subscriber installed here
//! bridges those records and writes them to stderr so reports on stdout stay
//! machine-readable. `RUST_LOG` selects the level and defaults to `warn`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::CliError;

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber.
pub(crate) fn init_logging() -> Result<(), CliError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
        .map_err(CliError::Logging)
}
