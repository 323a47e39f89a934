//! Binary entry point for the Bosun plugin host.
//!
//! The binary delegates to [`bosund::run`], which owns argument parsing,
//! config bootstrapping, plugin lifecycle, and the event loop.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    bosund::run(std::env::args_os(), &mut stdout, &mut stderr)
}
