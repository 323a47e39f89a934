//! Plugin ownership and lifecycle bookkeeping.
//!
//! The [`PluginRegistry`] owns every plugin for the lifetime of the process:
//! plugins enter via [`PluginRegistry::register`] and are destroyed only by
//! the final [`PluginRegistry::clear`] during host shutdown. Alongside the
//! name→plugin map the registry keeps three ordered sequences — registration,
//! initialization, and start order — which the host's startup and
//! reverse-order shutdown guarantees are built on.

use std::collections::HashMap;

use crate::error::PluginError;
use crate::plugin::{Plugin, PluginState};

/// Owning registry of hosted plugins.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, Box<dyn Plugin>>,
    registered: Vec<String>,
    initialized: Vec<String>,
    started: Vec<String>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of a plugin, keyed by its name.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::AlreadyRegistered`] when the name is taken.
    pub fn register(&mut self, plugin: Box<dyn Plugin>) -> Result<(), PluginError> {
        let name = plugin.name().to_owned();
        if self.plugins.contains_key(&name) {
            return Err(PluginError::AlreadyRegistered { name });
        }
        self.registered.push(name.clone());
        self.plugins.insert(name, plugin);
        Ok(())
    }

    /// Looks up a plugin by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&dyn Plugin> {
        self.plugins.get(name).map(Box::as_ref)
    }

    /// Looks up a plugin by name, mutably.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Box<dyn Plugin>> {
        self.plugins.get_mut(name)
    }

    /// Looks up a plugin by name, failing when it was never registered.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NotFound`] for unregistered names.
    pub fn get(&self, name: &str) -> Result<&dyn Plugin, PluginError> {
        self.find(name).ok_or_else(|| PluginError::not_found(name))
    }

    /// Mutable variant of [`PluginRegistry::get`].
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NotFound`] for unregistered names.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Box<dyn Plugin>, PluginError> {
        self.plugins
            .get_mut(name)
            .ok_or_else(|| PluginError::not_found(name))
    }

    /// Reports a plugin's lifecycle state without failing on absence.
    #[must_use]
    pub fn state_of(&self, name: &str) -> Option<PluginState> {
        self.find(name).map(Plugin::state)
    }

    /// Plugin names in registration order.
    #[must_use]
    pub fn registration_order(&self) -> &[String] {
        &self.registered
    }

    /// Plugin names in the order their initialize hooks completed.
    #[must_use]
    pub fn initialized_order(&self) -> &[String] {
        &self.initialized
    }

    /// Plugin names in the order their startup hooks completed.
    #[must_use]
    pub fn started_order(&self) -> &[String] {
        &self.started
    }

    /// Records a completed initialization; duplicates are ignored.
    pub fn record_initialized(&mut self, name: &str) {
        if !self.initialized.iter().any(|entry| entry == name) {
            self.initialized.push(name.to_owned());
        }
    }

    /// Records a completed startup; duplicates are ignored.
    pub fn record_started(&mut self, name: &str) {
        if !self.started.iter().any(|entry| entry == name) {
            self.started.push(name.to_owned());
        }
    }

    /// Number of registered plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns `true` when no plugins are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Drops every plugin and all bookkeeping.
    ///
    /// This is the only point plugins are destroyed; the host calls it once
    /// at the end of the shutdown sweep.
    pub fn clear(&mut self) {
        self.started.clear();
        self.initialized.clear();
        self.registered.clear();
        self.plugins.clear();
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("registered", &self.registered)
            .field("initialized", &self.initialized)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}
