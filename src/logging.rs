use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber. The level is `info`, or `debug` when `debug`
/// is set; with `debug` a `RUST_LOG` filter takes precedence.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
