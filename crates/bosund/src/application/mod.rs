//! The host application context and lifecycle orchestrator.
//!
//! [`Application`] is constructed once by the process entry point and owns
//! everything the run needs: the plugin registry, the merged option schema,
//! the resolved data directory and config path, and the event loop. There is
//! no global singleton; components receive the context by reference.
//!
//! The lifecycle contract it enforces:
//!
//! - plugins advance strictly forward (`registered` → `initialized` →
//!   `started`); initialize and startup are no-ops for plugins at or past
//!   the target state;
//! - startup visits plugins in initialization order; a startup failure
//!   propagates immediately and already-started plugins are not rolled back;
//! - shutdown visits started plugins in exact reverse start order, logs any
//!   per-plugin failure, and finishes by clearing the registry, making a
//!   second shutdown a no-op.

use std::env;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use bosun_config::{
    OptionSchema, OptionSpec, OptionsBuilder, ParsedOptions, apply_config_file,
    parse_command_line, render_help, write_default_config,
};
use bosun_plugins::{Plugin, PluginRegistry, PluginState};

use crate::errors::HostError;
use crate::event_loop::{EventLoop, StopHandle, TaskHandle};
use crate::signals;

const HOST_TARGET: &str = "bosund::application";
const DEFAULT_DATA_DIR: &str = "data-dir";
const DEFAULT_CONFIG_FILE: &str = "config.ini";

/// Outcome of host initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitControl {
    /// Bootstrap completed; the caller should start plugins and run the loop.
    Proceed,
    /// Help or version output was written; the process should exit cleanly
    /// without any plugin lifecycle calls.
    Exit,
}

/// Process-wide host context.
pub struct Application {
    bin_name: String,
    version: String,
    registry: PluginRegistry,
    schema: Option<OptionSchema>,
    options: Option<ParsedOptions>,
    data_dir: PathBuf,
    config_path: PathBuf,
    event_loop: EventLoop,
}

impl Application {
    /// Creates a host with an empty registry and idle event loop.
    #[must_use]
    pub fn new(bin_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            bin_name: bin_name.into(),
            version: version.into(),
            registry: PluginRegistry::new(),
            schema: None,
            options: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
            event_loop: EventLoop::new(),
        }
    }

    /// Hands a plugin to the registry.
    ///
    /// Registration order determines option-aggregation order. Plugins must
    /// be registered before [`Application::initialize`] finalizes the schema.
    ///
    /// # Errors
    ///
    /// Returns [`bosun_plugins::PluginError::AlreadyRegistered`] on a name
    /// collision.
    pub fn register_plugin(&mut self, plugin: Box<dyn Plugin>) -> Result<(), HostError> {
        self.registry.register(plugin)?;
        Ok(())
    }

    /// Builds the merged option schema from every registered plugin plus the
    /// application built-ins.
    fn collect_options(&self) -> Result<OptionSchema, HostError> {
        let mut schema = OptionSchema::new();
        for name in self.registry.registration_order() {
            let Some(plugin) = self.registry.find(name) else {
                continue;
            };
            let mut cli = OptionsBuilder::new();
            let mut config = OptionsBuilder::new();
            plugin.describe_options(&mut cli, &mut config);
            if !config.is_empty() {
                schema.extend_config(config.into_specs())?;
            }
            if !cli.is_empty() {
                schema.extend_cli(cli.into_specs())?;
            }
        }

        schema.extend_config([OptionSpec::list(
            "plugin",
            "Plugin(s) to enable, may be specified multiple times",
        )])?;
        schema.extend_cli([
            OptionSpec::switch("help", "Print this help message and exit").with_short('h'),
            OptionSpec::switch("version", "Print version information and exit").with_short('v'),
            OptionSpec::value("data-dir", "Directory containing configuration file config.ini")
                .with_short('d')
                .with_default(DEFAULT_DATA_DIR),
            OptionSpec::value("config", "Configuration file name relative to data-dir")
                .with_short('c')
                .with_default(DEFAULT_CONFIG_FILE),
        ])?;
        Ok(schema)
    }

    /// Bootstraps the host: aggregates options, parses the command line,
    /// materializes and reads the config file, and initializes the plugins
    /// selected via `--plugin` plus any `autostart` plugins still registered.
    ///
    /// Help and version requests are written to `out` and short-circuit with
    /// [`InitControl::Exit`] before any filesystem or lifecycle work.
    /// Autostart names that were never registered are skipped rather than
    /// treated as errors.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Config`] for schema collisions, command-line or
    /// config-file failures, and [`HostError::Plugin`] when a `--plugin` name
    /// is unknown or a plugin's initialize hook fails.
    pub fn initialize(
        &mut self,
        args: impl IntoIterator<Item = OsString>,
        autostart: &[&str],
        out: &mut dyn Write,
    ) -> Result<InitControl, HostError> {
        let schema = self.collect_options()?;
        let mut options = parse_command_line(&self.bin_name, &schema, args)?;

        if options.switch("help") {
            let help = render_help(&self.bin_name, &schema);
            writeln!(out, "{help}").map_err(|source| HostError::Output { source })?;
            return Ok(InitControl::Exit);
        }
        if options.switch("version") {
            writeln!(out, "{} {}", self.bin_name, self.version)
                .map_err(|source| HostError::Output { source })?;
            return Ok(InitControl::Exit);
        }

        self.resolve_paths(&options)?;

        if write_default_config(&self.config_path, schema.config_options())? {
            info!(
                target: HOST_TARGET,
                path = %self.config_path.display(),
                "materialized default config file"
            );
        }
        apply_config_file(&self.config_path, &schema, &mut options)?;
        options.apply_defaults(&schema);

        let requested: Vec<String> = options.values("plugin").to_vec();
        for name in &requested {
            self.initialize_plugin(name, &options)?;
        }
        for name in autostart {
            if self.registry.state_of(name) == Some(PluginState::Registered) {
                self.initialize_plugin(name, &options)?;
            }
        }

        self.schema = Some(schema);
        self.options = Some(options);
        Ok(InitControl::Proceed)
    }

    fn resolve_paths(&mut self, options: &ParsedOptions) -> Result<(), HostError> {
        let mut data_dir = PathBuf::from(options.value("data-dir").unwrap_or(DEFAULT_DATA_DIR));
        if data_dir.is_relative() {
            let cwd = env::current_dir()
                .map_err(|source| bosun_config::ConfigError::io(".", source))?;
            data_dir = cwd.join(data_dir);
        }

        let mut config_path =
            PathBuf::from(options.value("config").unwrap_or(DEFAULT_CONFIG_FILE));
        if config_path.is_relative() {
            config_path = data_dir.join(config_path);
        }

        self.data_dir = data_dir;
        self.config_path = config_path;
        Ok(())
    }

    /// Initializes one plugin by name.
    ///
    /// A plugin already at or past `initialized` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`bosun_plugins::PluginError::NotFound`] for unregistered
    /// names and propagates initialize-hook failures.
    pub fn initialize_plugin(
        &mut self,
        name: &str,
        options: &ParsedOptions,
    ) -> Result<(), HostError> {
        let plugin = self.registry.get_mut(name)?;
        if plugin.state() > PluginState::Registered {
            debug!(target: HOST_TARGET, plugin = name, "already initialized, skipping");
            return Ok(());
        }
        plugin.initialize(options)?;
        self.registry.record_initialized(name);
        info!(target: HOST_TARGET, plugin = name, "plugin initialized");
        Ok(())
    }

    /// Starts every initialized plugin, in initialization order.
    ///
    /// # Errors
    ///
    /// Propagates the first startup-hook failure immediately; plugins started
    /// before the failure stay started (no rollback).
    pub fn startup(&mut self) -> Result<(), HostError> {
        for name in self.registry.initialized_order().to_vec() {
            let plugin = self.registry.get_mut(&name)?;
            if plugin.state() == PluginState::Started {
                continue;
            }
            plugin.startup()?;
            self.registry.record_started(&name);
            info!(target: HOST_TARGET, plugin = %name, "plugin started");
        }
        Ok(())
    }

    /// Shuts down every started plugin in reverse start order, then clears
    /// the registry.
    ///
    /// A failing plugin shutdown is logged and the sweep continues; the
    /// registry clear at the end is the only point plugins are destroyed.
    /// Calling this twice is safe: the second sweep sees empty sequences.
    pub fn shutdown(&mut self) {
        let started = self.registry.started_order().to_vec();
        for name in started.iter().rev() {
            let Some(plugin) = self.registry.find_mut(name) else {
                continue;
            };
            match plugin.shutdown() {
                Ok(()) => info!(target: HOST_TARGET, plugin = %name, "plugin shut down"),
                Err(failure) => {
                    error!(
                        target: HOST_TARGET,
                        plugin = %name,
                        error = %failure,
                        "plugin shutdown failed, continuing sweep"
                    );
                }
            }
        }
        self.registry.clear();
    }

    /// Arms the shutdown signals, runs the event loop until a stop request,
    /// then performs one synchronous shutdown pass.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Signals`] when handler installation fails.
    pub fn exec(&mut self) -> Result<(), HostError> {
        signals::arm(&self.event_loop.stopper())?;
        info!(target: HOST_TARGET, "entering event loop");
        self.event_loop.run();
        info!(target: HOST_TARGET, "event loop stopped, shutting down plugins");
        self.shutdown();
        Ok(())
    }

    /// Requests the event loop to stop; usable instead of a signal.
    pub fn quit(&self) {
        self.event_loop.quit();
    }

    /// The event loop owned by this host.
    #[must_use]
    pub const fn event_loop(&self) -> &EventLoop {
        &self.event_loop
    }

    /// `Send` handle for requesting a stop from other threads.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.event_loop.stopper()
    }

    /// Handle for posting work onto the loop from loop-thread code.
    #[must_use]
    pub fn task_handle(&self) -> TaskHandle {
        self.event_loop.handle()
    }

    /// The resolved data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The resolved config-file path.
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Reports a plugin's lifecycle state.
    #[must_use]
    pub fn plugin_state(&self, name: &str) -> Option<PluginState> {
        self.registry.state_of(name)
    }

    /// The plugin registry.
    #[must_use]
    pub const fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// The resolved option values, once initialization has run.
    #[must_use]
    pub const fn options(&self) -> Option<&ParsedOptions> {
        self.options.as_ref()
    }

    /// The finalized option schema, once initialization has run.
    #[must_use]
    pub const fn schema(&self) -> Option<&OptionSchema> {
        self.schema.as_ref()
    }
}

#[cfg(test)]
mod tests;
