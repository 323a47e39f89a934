//! Domain errors raised by plugin lifecycle operations.

use thiserror::Error;

/// Errors arising from plugin registration and lifecycle calls.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The requested plugin was never registered.
    #[error("plugin '{name}' not found in registry")]
    NotFound {
        /// Name that was looked up.
        name: String,
    },

    /// A plugin with the same name is already registered.
    #[error("plugin '{name}' is already registered")]
    AlreadyRegistered {
        /// The colliding plugin name.
        name: String,
    },

    /// The plugin's initialize hook failed.
    #[error("plugin '{name}' failed to initialize: {message}")]
    Initialize {
        /// Plugin name.
        name: String,
        /// Human-readable failure description.
        message: String,
    },

    /// The plugin's startup hook failed.
    #[error("plugin '{name}' failed to start: {message}")]
    Startup {
        /// Plugin name.
        name: String,
        /// Human-readable failure description.
        message: String,
    },

    /// The plugin's shutdown hook failed.
    #[error("plugin '{name}' failed to shut down: {message}")]
    Shutdown {
        /// Plugin name.
        name: String,
        /// Human-readable failure description.
        message: String,
    },
}

impl PluginError {
    /// Builds a [`PluginError::NotFound`] for the given name.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Builds a [`PluginError::Initialize`] failure.
    pub fn initialize(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Initialize {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Builds a [`PluginError::Startup`] failure.
    pub fn startup(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Startup {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Builds a [`PluginError::Shutdown`] failure.
    pub fn shutdown(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Shutdown {
            name: name.into(),
            message: message.into(),
        }
    }
}
