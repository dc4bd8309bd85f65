/// Install a `tracing` fmt subscriber.
///
/// `RUST_LOG` overrides the default filter when set.
pub fn init() {
    init_with_filter("info,fontcache_text=debug,cosmic_text=warn");
}

/// Install a `tracing` fmt subscriber with an explicit default filter.
pub fn init_with_filter(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    // A subscriber may already be installed by the host application.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
