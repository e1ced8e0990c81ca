//! Logging initialization

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber writing to stderr
///
/// `RUST_LOG` overrides the level picked from `verbose`.
pub fn init_logging(verbose: bool, suppress_prefixes: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,git_broadcast={level}")));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if suppress_prefixes {
        builder.without_time().with_level(false).init();
    } else {
        builder.init();
    }
}
