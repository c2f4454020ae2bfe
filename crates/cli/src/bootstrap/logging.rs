use dnsforward_domain::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Process logging goes to stdout; stderr is left to the audit trail.
/// `RUST_LOG` takes precedence over `logging.level`.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stdout)
        .init();

    info!(
        level = %config.logging.level,
        log_queries = config.logging.log_queries,
        "Logging initialized"
    );
}
