use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.  `env_filter` accepts anything `EnvFilter` does, e.g.
/// `info` or `sk_snapshot=debug,warn`.
pub fn setup(env_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .compact()
        .init();
}
