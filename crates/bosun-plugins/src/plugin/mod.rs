//! The plugin lifecycle contract.

use std::fmt;

use bosun_config::{OptionsBuilder, ParsedOptions};

use crate::error::PluginError;

/// Lifecycle position of a plugin.
///
/// States only advance forward: `Registered` → `Initialized` → `Started`.
/// The derived ordering reflects that progression, so "at or past
/// initialization" reads as `state >= PluginState::Initialized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PluginState {
    /// Known to the registry; no lifecycle hook has run.
    Registered,
    /// The initialize hook completed.
    Initialized,
    /// The startup hook completed.
    Started,
}

impl fmt::Display for PluginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Registered => "registered",
            Self::Initialized => "initialized",
            Self::Started => "started",
        };
        f.write_str(label)
    }
}

/// Contract every hosted subsystem implements.
///
/// The host invokes the lifecycle hooks in a fixed order on a single logical
/// thread: `describe_options` during schema aggregation, then `initialize`,
/// `startup`, and `shutdown`. An implementation owns its [`PluginState`] and
/// must advance it when a lifecycle hook succeeds; the host additionally
/// checks `state()` before every call, so initialize and startup are no-ops
/// for a plugin already at or past the target state.
pub trait Plugin {
    /// Unique plugin name; registry lookups and the `plugin` option use it.
    fn name(&self) -> &str;

    /// Current lifecycle state.
    fn state(&self) -> PluginState;

    /// Declares the plugin's options.
    ///
    /// `cli` declarations are valid only on the command line; `config`
    /// declarations are valid in the config file and on the command line.
    fn describe_options(&self, cli: &mut OptionsBuilder, config: &mut OptionsBuilder);

    /// Consumes resolved option values and prepares the plugin for startup.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Initialize`] when preparation fails; the host
    /// aborts the run before the event loop starts.
    fn initialize(&mut self, options: &ParsedOptions) -> Result<(), PluginError>;

    /// Begins active operation.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Startup`] on failure; the host aborts the
    /// remaining startup sequence without rolling back already-started
    /// plugins.
    fn startup(&mut self) -> Result<(), PluginError>;

    /// Stops active operation and releases resources.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Shutdown`] on failure; the host logs the error
    /// and continues shutting down the remaining plugins.
    fn shutdown(&mut self) -> Result<(), PluginError>;
}

impl fmt::Debug for dyn Plugin + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
