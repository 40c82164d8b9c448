use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber for the CLI.
///
/// `RUST_LOG` wins over `level` when set. Output goes to stderr so JSON on
/// stdout stays machine-readable. Calling this twice is harmless.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
