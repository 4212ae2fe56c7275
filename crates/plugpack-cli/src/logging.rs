//! Diagnostic tracing for the CLI.
//!
//! Command results go through the output formatters on stdout. Tracing is
//! for diagnostics only and always writes to stderr, so `--json` output
//! stays parseable.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `--verbose` selects `debug`,
/// `--quiet` selects `error` and the default is `warn`.
pub fn init(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    // A second init (e.g. from tests) is not an error worth reporting
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}

const fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "plugpack_core=debug,plugpack=debug,warn"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}
