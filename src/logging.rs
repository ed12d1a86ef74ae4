use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber with env filter
/// Default level: info, configurable via RUST_LOG
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,rdkafka=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
