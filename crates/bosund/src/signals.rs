//! Interrupt and terminate signal arming.
//!
//! The first delivery of SIGINT or SIGTERM sets the event loop's stop flag
//! and is handled by the loop as ordinary control flow. A repeat delivery of
//! the same signal finds the flag already set and escalates to an immediate
//! process exit with the conventional 128+signum status, so a host stuck in
//! a hung plugin shutdown can still be interrupted.

use std::io;

use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook::flag;
use thiserror::Error;

use crate::event_loop::StopHandle;

/// Signals the host listens for, with their escalation exit codes.
const SHUTDOWN_SIGNALS: &[(i32, i32)] = &[(SIGINT, 130), (SIGTERM, 143)];

/// Errors reported while installing signal handlers.
#[derive(Debug, Error)]
pub enum SignalError {
    /// The OS rejected the handler registration.
    #[error("failed to install handler for signal {signal}: {source}")]
    Install {
        /// Signal number that failed to register.
        signal: i32,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
}

/// Arms the shutdown signals against the given stop handle.
///
/// Registration order matters: the conditional-shutdown action is installed
/// first so a delivery that finds the stop flag already set exits the
/// process, while the flag-setting action installed second handles the first
/// delivery.
///
/// # Errors
///
/// Returns [`SignalError::Install`] when handler registration fails.
pub fn arm(stopper: &StopHandle) -> Result<(), SignalError> {
    for &(signal, exit_code) in SHUTDOWN_SIGNALS {
        flag::register_conditional_shutdown(signal, exit_code, stopper.flag())
            .map_err(|source| SignalError::Install { signal, source })?;
        flag::register(signal, stopper.flag())
            .map_err(|source| SignalError::Install { signal, source })?;
    }
    Ok(())
}
