use tracing_subscriber::EnvFilter;

/// Initialise logging on stderr. Defaults to `info`; with `debug` set the
/// level drops to `debug` and `RUST_LOG` may override it.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    // try_init so tests and embedding hosts that already set a subscriber are left alone
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
