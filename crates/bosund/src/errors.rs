//! Host-level error type.

use std::io;

use thiserror::Error;

use bosun_config::ConfigError;
use bosun_plugins::PluginError;

use crate::signals::SignalError;

/// Errors surfaced by the host bootstrap, lifecycle, and event loop.
#[derive(Debug, Error)]
pub enum HostError {
    /// Schema assembly, parsing, or config-file handling failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A plugin lookup or lifecycle hook failed.
    #[error(transparent)]
    Plugin(#[from] PluginError),

    /// Signal handler installation failed.
    #[error(transparent)]
    Signals(#[from] SignalError),

    /// Writing help or version output to the provided sink failed.
    #[error("failed to write host output: {source}")]
    Output {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}
