//! Log setup for the `ddlgen` binary.
//!
//! Logging is controlled by:
//! - `DDLGEN_LOG` - an `EnvFilter` directive such as `debug` or `ddlgen_schema=trace`
//! - `-v` / `-vv` - raise the level to debug / trace, overriding `DDLGEN_LOG`
//!
//! Logs are written to stderr so generated code printed on stdout stays clean.

use std::env;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "DDLGEN_LOG";

/// Filter directive for a verbosity count, falling back to `DDLGEN_LOG`.
pub fn directive(verbose: u8) -> String {
    match verbose {
        0 => env::var(LOG_ENV).unwrap_or_else(|_| "warn".to_string()),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_new(directive(verbose)).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_overrides_env() {
        assert_eq!(directive(1), "debug");
        assert_eq!(directive(2), "trace");
        assert_eq!(directive(5), "trace");
    }
}
