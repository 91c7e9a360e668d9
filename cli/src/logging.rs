use tracing_subscriber::EnvFilter;

// Filter used when RUST_LOG is not set.
fn default_directive(verbosity: u64) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

// Install the process-wide subscriber. Log events go to stderr so they never
// mix with command output on stdout.
pub(crate) fn init(verbosity: u64) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    // Only fails if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
