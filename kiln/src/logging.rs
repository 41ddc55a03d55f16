//! Diagnostic logging on stderr.

use eyre::{Result, WrapErr};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding an `EnvFilter` directive, e.g.
/// `KILN_LOG=kiln_codegen=debug`.
pub const LOG_ENV: &str = "KILN_LOG";

/// How chatty the run is, from the `-v` and `-q` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose(u8),
}

impl Verbosity {
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Normal,
            (false, n) => Verbosity::Verbose(n),
        }
    }

    fn directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose(1) => "info",
            Verbosity::Verbose(2) => "debug",
            Verbosity::Verbose(_) => "trace",
        }
    }
}

/// Install the fmt subscriber. `KILN_LOG` wins over the verbosity flags.
pub fn init(verbosity: Verbosity) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(verbosity.directive()))
        .wrap_err("invalid log filter")?;

    let layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .wrap_err("failed to install the log subscriber")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_directives() {
        assert_eq!(Verbosity::from_flags(0, true).directive(), "error");
        assert_eq!(Verbosity::from_flags(3, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(0, false).directive(), "warn");
        assert_eq!(Verbosity::from_flags(1, false).directive(), "info");
        assert_eq!(Verbosity::from_flags(2, false).directive(), "debug");
        assert_eq!(Verbosity::from_flags(5, false).directive(), "trace");
    }
}
