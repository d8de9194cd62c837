//! Tracing subscriber initialization for the `tagnorm` binary.
//!
//! Filter priority (highest first): `TAGNORM_LOG`, `RUST_LOG`, the CLI
//! `--verbose`/`--quiet` flags, then `warn`. Logs go to stderr so JSON on
//! stdout stays clean.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Environment variable with per-target filter directives.
pub const LOG_ENV_VAR: &str = "TAGNORM_LOG";

/// How much the binary logs when no filter variable is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// `-q`: errors only.
    Quiet,
    #[default]
    Normal,
    /// `-v`: debug events from `tagnorm`, warnings from dependencies.
    Verbose,
}

impl Verbosity {
    /// `-v` overrides `-q` when both are given.
    #[must_use]
    pub const fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (verbose, quiet) {
            (true, _) => Self::Verbose,
            (false, true) => Self::Quiet,
            (false, false) => Self::Normal,
        }
    }

    /// Most verbose level this setting lets through for `tagnorm` targets.
    #[must_use]
    pub const fn crate_level(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::ERROR,
            Self::Normal => LevelFilter::WARN,
            Self::Verbose => LevelFilter::DEBUG,
        }
    }

    /// Filter directive used when neither `TAGNORM_LOG` nor `RUST_LOG` applies.
    #[must_use]
    pub fn directive(self) -> String {
        match self {
            Self::Verbose => format!(
                "{},{}={}",
                LevelFilter::WARN,
                env!("CARGO_CRATE_NAME"),
                self.crate_level()
            ),
            Self::Quiet | Self::Normal => self.crate_level().to_string(),
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// Call once, before config loading, so config traces are captured.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_subscriber(verbosity: Verbosity, no_color: bool) {
    let stderr_is_tty = std::io::IsTerminal::is_terminal(&std::io::stderr());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color && stderr_is_tty)
        .with_target(verbosity == Verbosity::Verbose)
        .without_time()
        .compact();

    tracing_subscriber::registry()
        .with(build_env_filter(verbosity))
        .with(fmt_layer)
        .init();
}

fn build_env_filter(verbosity: Verbosity) -> EnvFilter {
    // An unparseable TAGNORM_LOG falls through to RUST_LOG / flags.
    if let Ok(directives) = std::env::var(LOG_ENV_VAR)
        && let Ok(filter) = EnvFilter::try_new(&directives)
    {
        return filter;
    }

    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    EnvFilter::try_new(verbosity.directive())
        .unwrap_or_else(|_| EnvFilter::new(verbosity.crate_level().to_string()))
}
