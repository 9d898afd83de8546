//! Logging facade over [`tracing`], kept off stdout.
//!
//! `homeenv profile` prints shell statements on stdout for the login shell
//! to evaluate, so every diagnostic goes to stderr via a
//! [`tracing_subscriber`] fmt layer installed by [`init`]. Commands receive
//! a [`Logger`] and never touch the tracing macros directly.

use tracing_subscriber::EnvFilter;

/// Install the global stderr subscriber.
///
/// The filter honours `RUST_LOG` when set; otherwise `--verbose` selects
/// `debug`, and the default is `info`. Repeated calls are a no-op so tests
/// can initialise freely.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Structured logger handed to command handlers.
///
/// The methods mirror the message kinds the commands emit; all of them
/// forward to [`tracing`] so the subscriber decides visibility.
#[derive(Debug, Default, Clone, Copy)]
pub struct Logger;

impl Logger {
    /// Create a new logger.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!("==> {msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (visible with `--verbose` or `RUST_LOG=debug`).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!("[dry run] {msg}");
    }
}
