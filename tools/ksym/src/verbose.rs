//! Log level selection for ksym.
//!
//! `-q` and `-v` pick a [`Verbosity`], which decides the default `tracing`
//! filter for both ksym and the parser library. `RUST_LOG` overrides it.
//! Progress details are plain `tracing::info!`/`debug!` events. Only
//! [`status!`] writes to stderr directly, since its lines are part of the
//! normal output rather than the log.

use std::sync::OnceLock;
use std::time::Instant;

use tracing_subscriber::EnvFilter;

/// How much ksym reports besides query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Parse warnings and status lines.
    Normal,
    /// Everything, including ignored lines and phase timings.
    Verbose,
}

impl Verbosity {
    /// Level for the `-q`/`-v` pair. The CLI makes them exclusive; `quiet` wins otherwise.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        }
    }

    /// Filter directive used when `RUST_LOG` is unset.
    pub fn filter(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "debug",
        }
    }

    /// The level chosen by [`init`], or `Normal` before it ran.
    pub fn current() -> Self {
        LEVEL.get().copied().unwrap_or(Verbosity::Normal)
    }
}

static LEVEL: OnceLock<Verbosity> = OnceLock::new();

/// Record `level` and install the stderr subscriber.
pub fn init(level: Verbosity) {
    let _ = LEVEL.set(level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.filter()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// `eprintln!` unless running with `-q`.
macro_rules! status {
    ($($arg:tt)*) => {
        if $crate::verbose::Verbosity::current() != $crate::verbose::Verbosity::Quiet {
            eprintln!($($arg)*);
        }
    };
}

pub(crate) use status;

/// Emits a `debug` event with the elapsed time of a phase when dropped.
pub struct PhaseTimer {
    phase: &'static str,
    started: Instant,
}

impl PhaseTimer {
    pub fn new(phase: &'static str) -> Self {
        Self {
            phase,
            started: Instant::now(),
        }
    }
}

impl Drop for PhaseTimer {
    fn drop(&mut self) {
        tracing::debug!(phase = self.phase, elapsed = ?self.started.elapsed(), "phase finished");
    }
}
