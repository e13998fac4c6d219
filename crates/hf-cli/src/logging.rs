//! Tracing subscriber setup for the `hf` binary. Events go to stderr so
//! stdout carries only command output.

use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

/// Filter directive for `-v` repetitions.
pub fn directive_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// `RUST_LOG` when set and valid, otherwise the `-v` level.
pub fn filter_for_verbosity(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(verbose)))
}

/// Install the global subscriber. Call once, before any other work.
pub fn init_tracing(verbose: u8, format: LogFormat) {
    let filter = filter_for_verbosity(verbose);
    match format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(directive_for_verbosity(0), "warn");
        assert_eq!(directive_for_verbosity(1), "info");
        assert_eq!(directive_for_verbosity(2), "debug");
        assert_eq!(directive_for_verbosity(7), "trace");
    }
}
