use tracing_subscriber::filter::EnvFilter;

const LOG_ENV: &str = "VERSION_BUMP_LOG";

/// install the stderr tracing subscriber.
///
/// `VERSION_BUMP_LOG` wins over `RUST_LOG`; without either the level is `warn`,
/// or `debug` when `verbose` is set.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = std::env::var(LOG_ENV)
        .ok()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(fallback));

    // a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
