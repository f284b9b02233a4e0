//! Diagnostic log setup

use tablerestore_core::LogFormat;

/// Install the global subscriber. Logs go to stderr so stdout carries only
/// the progress narrative. `RUST_LOG` directives are honoured, `info` is
/// added as the baseline.
pub fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();
    let env_filter = match "info".parse() {
        Ok(directive) => env_filter.add_directive(directive),
        Err(_) => env_filter,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    // A subscriber may already be installed (tests); keep it.
    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
}
