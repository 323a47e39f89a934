//! The Bosun plugin host daemon.
//!
//! `bosund` owns a set of pluggable subsystems and drives them through a
//! uniform lifecycle: plugins are registered, their option declarations are
//! merged into one configuration surface, the selected plugins are
//! initialized and started, and a single-threaded cooperative event loop
//! runs until an interrupt or terminate signal (or an explicit quit request)
//! stops it. Shutdown then visits started plugins in reverse start order.
//!
//! The crate is exercised both from the binary entry point and from tests:
//! [`run`] accepts the argument iterator and output sinks explicitly so the
//! whole bootstrap can be driven without a real terminal.

use std::env;
use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

pub mod application;
pub mod errors;
pub mod event_loop;
pub mod signals;
pub mod telemetry;

pub use self::application::{Application, InitControl};
pub use self::errors::HostError;
pub use self::event_loop::{EventLoop, StopHandle, TaskHandle};

#[cfg(test)]
mod tests;

/// Runs the host end to end and maps the outcome to a process exit code.
///
/// Initializes telemetry (filter taken from `BOSUN_LOG`, defaulting to
/// `info`), bootstraps an [`Application`], starts its plugins, and blocks in
/// the event loop until a stop request arrives. Errors are rendered to
/// `stderr`; help and version output goes to `stdout`.
pub fn run(
    args: impl IntoIterator<Item = OsString>,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> ExitCode {
    let filter = env::var("BOSUN_LOG").unwrap_or_else(|_| "info".to_owned());
    if let Err(error) = telemetry::initialise(&filter) {
        let _ = writeln!(stderr, "{error}");
        return ExitCode::FAILURE;
    }

    let mut app = Application::new("bosund", env!("CARGO_PKG_VERSION"));
    match app.initialize(args, &[], stdout) {
        Ok(InitControl::Exit) => return ExitCode::SUCCESS,
        Ok(InitControl::Proceed) => {}
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            return ExitCode::FAILURE;
        }
    }

    if let Err(error) = app.startup() {
        let _ = writeln!(stderr, "{error}");
        app.shutdown();
        return ExitCode::FAILURE;
    }
    if let Err(error) = app.exec() {
        let _ = writeln!(stderr, "{error}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
