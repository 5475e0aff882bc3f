//! Subscriber setup for validation diagnostics.
//!
//! Validation runs emit `tracing` events under the `confcheck` target, each
//! check inside a `check_key` span carrying the configuration key. The
//! verbosity set here applies to those events only; other crates in the
//! embedding binary stay at `warn` unless `CONFCHECK_LOG_LEVEL` says
//! otherwise.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

/// Environment variable holding a full `tracing` filter directive.
pub const LOG_LEVEL_ENV: &str = "CONFCHECK_LOG_LEVEL";

/// Target prefix of every event emitted by validation runs.
pub const LOG_TARGET: &str = "confcheck";

/// Name of the span wrapping the checks of one configuration key.
pub const KEY_SPAN: &str = "check_key";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines, colored when stderr is a terminal.
    #[default]
    Human,
    /// Newline-delimited JSON with the current key span attached.
    Json,
}

/// Builds the filter directive for a verbosity level.
///
/// Level 0 leaves everything at `warn`, which still shows checks that could
/// not be resolved. Each further level raises the `confcheck` target:
/// 1 reports run summaries, 2 each failed check, 3+ every check executed.
#[must_use]
pub fn filter_directive(verbosity: u8) -> String {
    let level = match verbosity {
        0 => return "warn".to_string(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("warn,{LOG_TARGET}={level}")
}

/// Installs a stderr subscriber for validation diagnostics.
///
/// At verbosity 2 and above, human output also reports when each key span
/// closes, with its elapsed time. Uses `try_init()`, so a subscriber that is
/// already installed is left in place.
pub fn init_logging(format: LogFormat, verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbosity)));

    let span_events = if verbosity >= 2 {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    match format {
        LogFormat::Human => {
            let use_ansi =
                std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(use_ansi)
                .with_span_events(span_events)
                .with_target(verbosity >= 3)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogFormat::Json => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_by_default() {
        assert_eq!(LogFormat::default(), LogFormat::Human);
        assert_eq!(filter_directive(0), "warn");
    }

    #[test]
    fn verbosity_raises_only_the_crate_target() {
        assert_eq!(filter_directive(1), "warn,confcheck=info");
        assert_eq!(filter_directive(2), "warn,confcheck=debug");
        assert_eq!(filter_directive(3), "warn,confcheck=trace");
        assert_eq!(filter_directive(255), "warn,confcheck=trace");
    }

    #[test]
    fn directives_parse() {
        for verbosity in 0..=3 {
            assert!(EnvFilter::try_new(filter_directive(verbosity)).is_ok());
        }
    }
}
