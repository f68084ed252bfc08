//! Log subscriber setup.
//!
//! Events go to stderr so `check --format json` keeps stdout clean.
//! `RUST_LOG`, when set, replaces the computed filter entirely.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Library targets held at `warn` regardless of the base level.
pub(crate) const NOISY_MODULES: &[&str] = &["hyper", "hyper_util", "reqwest", "h2", "rustls"];

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormat {
    /// Human-readable, colored
    Pretty,
    /// One JSON object per event
    Json,
}

fn directives(log_level: &str) -> String {
    let mut directives = String::from(log_level);
    for module in NOISY_MODULES {
        directives.push_str(&format!(",{module}=warn"));
    }
    directives
}

fn build_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(log_level)))
}

/// Installs the global subscriber. Later calls are no-ops.
pub(crate) fn init_logging(log_level: &str, log_format: LogFormat) {
    let subscriber = tracing_subscriber::registry().with(build_filter(log_level));

    match log_format {
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_target(true)
                .with_file(true)
                .with_line_number(true);
            let _ = subscriber.with(fmt_layer).try_init();
        }
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .with_target(true)
                .with_file(false)
                .with_line_number(false);
            let _ = subscriber.with(fmt_layer).try_init();
        }
    }

    tracing::debug!(
        log_level = %log_level,
        log_format = ?log_format,
        noise_filtered = NOISY_MODULES.len(),
        "logging initialized"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives_silence_noisy_modules() {
        let d = directives("debug");
        assert!(d.starts_with("debug,"));
        for module in NOISY_MODULES {
            assert!(d.contains(&format!("{module}=warn")));
        }
    }

    #[test]
    fn test_directives_parse() {
        assert!(EnvFilter::try_new(directives("info")).is_ok());
        assert!(EnvFilter::try_new(directives("mizan=trace")).is_ok());
    }
}
