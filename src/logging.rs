use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";

fn make_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. Level is INFO unless `RUST_LOG` says
/// otherwise. Logs go to stderr so `calc --json` output stays clean.
/// Calling it twice is harmless; the second call is ignored.
pub fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(make_filter())
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
