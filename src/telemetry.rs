//! Tracing subscriber setup for binaries and demos
//!
//! The library only emits `tracing` events; nothing is printed until an
//! application installs a subscriber, usually through [`init_tracing`].

use std::io::IsTerminal;
use std::sync::OnceLock;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Filter used when `RUST_LOG` is unset or unparsable
pub const DEFAULT_FILTER: &str = "info";

/// Install a formatted subscriber filtered by `RUST_LOG` (default `info`).
///
/// # Errors
///
/// [`InitError::AlreadyInitialised`] on a second call, or
/// [`InitError::Subscriber`] if another global subscriber was set elsewhere.
pub fn init_tracing() -> Result<(), InitError> {
    INITIALISED
        .set(())
        .map_err(|()| InitError::AlreadyInitialised)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    Registry::default()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| InitError::Subscriber(e.to_string()))
}

/// Errors emitted when configuring the tracing subscriber.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// [`init_tracing`] already ran in this process
    #[error("tracing has already been initialised")]
    AlreadyInitialised,
    /// The global subscriber could not be installed
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(String),
}
