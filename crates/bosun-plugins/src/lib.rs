//! Plugin contract and registry for the Bosun host.
//!
//! A plugin is an independently-authored subsystem the host drives through a
//! fixed lifecycle: it is registered, then initialized with the resolved
//! option values, then started, and finally shut down in reverse start
//! order. The [`Plugin`] trait captures that contract as a boxed trait
//! object; the [`PluginRegistry`] owns every plugin for the lifetime of the
//! process and keeps the ordered bookkeeping the host's shutdown guarantees
//! rest on.
//!
//! The host mutates all registry state from a single logical thread, so the
//! registry carries no synchronization, only ordering discipline.

pub mod error;
pub mod plugin;
pub mod registry;

pub use self::error::PluginError;
pub use self::plugin::{Plugin, PluginState};
pub use self::registry::PluginRegistry;
