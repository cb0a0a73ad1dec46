use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SLACK_AUGMENT_LOG";

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,slack_export_augment=info"
    } else {
        "warn"
    }
}

/// Progress goes to stderr so stdout stays reserved for the report.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
