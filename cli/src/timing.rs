//! Diagnostics for the `qrstamp` binary.
//!
//! Everything goes to stderr so stdout stays a clean list of written paths.
//! `--verbose` lowers the default level to DEBUG; `--timing` reports the
//! duration of the instrumented `place` and `batch` spans when they close.
//! `RUST_LOG` overrides the default level. Records from the `log` facade
//! used by the library crate are forwarded into the same subscriber.

use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber for this run.
pub fn init_tracing(verbose: bool, timing: bool) {
    subscriber(verbose, timing).init();
}

fn subscriber(verbose: bool, timing: bool) -> impl Subscriber + Send + Sync {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(verbose, timing).into())
        .from_env_lossy();
    let span_events = if timing {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    fmt()
        .with_env_filter(filter)
        .with_span_events(span_events)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .finish()
}

/// Default level when `RUST_LOG` is unset.
fn default_level(verbose: bool, timing: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else if timing {
        // span close events are INFO
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(true, true), LevelFilter::DEBUG);
        assert_eq!(default_level(false, true), LevelFilter::INFO);
        assert_eq!(default_level(false, false), LevelFilter::WARN);
    }

    #[test]
    fn test_subscriber_runs_instrumented_code() {
        let ran = tracing::subscriber::with_default(subscriber(false, true), || {
            let span = tracing::info_span!("place");
            let _guard = span.enter();
            tracing::debug!("suppressed below INFO");
            true
        });
        assert!(ran);
    }
}
