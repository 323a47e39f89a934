//! Option declarations and the merged schema.
//!
//! Plugins declare options into [`OptionsBuilder`]s without any knowledge of
//! each other; the host folds those builders into one [`OptionSchema`]. The
//! schema keeps two views: the full command-line surface and the subset that
//! is also valid in the config file. Long names must be globally unique
//! across the whole merged surface; a collision is a hard configuration
//! error, never a silent override.

use std::collections::HashSet;

use crate::error::ConfigError;

/// The shape of the value an option accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueShape {
    /// A boolean switch; present means `true`.
    Switch,
    /// A single textual value, with an optional declared default.
    Value {
        /// Default rendered into the materialized config file and backfilled
        /// after parsing when no source set the option.
        default: Option<String>,
    },
    /// A repeatable value; occurrences compose across sources and each
    /// occurrence may itself hold several comma- or whitespace-separated
    /// entries.
    List,
}

/// A single option declaration.
#[derive(Debug, Clone)]
pub struct OptionSpec {
    long: String,
    short: Option<char>,
    description: String,
    shape: ValueShape,
}

impl OptionSpec {
    /// Declares a boolean switch.
    pub fn switch(long: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            long: long.into(),
            short: None,
            description: description.into(),
            shape: ValueShape::Switch,
        }
    }

    /// Declares a single-valued option with no default.
    pub fn value(long: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            long: long.into(),
            short: None,
            description: description.into(),
            shape: ValueShape::Value { default: None },
        }
    }

    /// Declares a repeatable list option.
    pub fn list(long: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            long: long.into(),
            short: None,
            description: description.into(),
            shape: ValueShape::List,
        }
    }

    /// Attaches a short flag.
    #[must_use]
    pub fn with_short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Attaches a default value; only meaningful for single-valued options.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        if let ValueShape::Value { default: slot } = &mut self.shape {
            *slot = Some(default.into());
        }
        self
    }

    /// The option's long name.
    #[must_use]
    pub fn long(&self) -> &str {
        &self.long
    }

    /// The option's short flag, when declared.
    #[must_use]
    pub const fn short(&self) -> Option<char> {
        self.short
    }

    /// Human-readable description, shown in help output and the materialized
    /// config file.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The declared value shape.
    #[must_use]
    pub const fn shape(&self) -> &ValueShape {
        &self.shape
    }

    /// The declared default, when one exists.
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        match &self.shape {
            ValueShape::Value { default } => default.as_deref(),
            ValueShape::Switch | ValueShape::List => None,
        }
    }
}

/// Per-plugin collector handed to a plugin's describe-options hook.
#[derive(Debug, Default)]
pub struct OptionsBuilder {
    specs: Vec<OptionSpec>,
}

impl OptionsBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a declaration.
    pub fn push(&mut self, spec: OptionSpec) -> &mut Self {
        self.specs.push(spec);
        self
    }

    /// Returns `true` when the plugin declared nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Consumes the builder, yielding the declarations in insertion order.
    #[must_use]
    pub fn into_specs(self) -> Vec<OptionSpec> {
        self.specs
    }
}

/// The merged, collision-checked option surface.
///
/// `cli` holds every option accepted on the command line (CLI-only options
/// plus all config options); `config` holds only the options valid in the
/// config file. The schema must be finalized before any parsing occurs.
#[derive(Debug, Default)]
pub struct OptionSchema {
    cli: Vec<OptionSpec>,
    config: Vec<OptionSpec>,
    names: HashSet<String>,
}

impl OptionSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends config-file options; they also join the command-line surface.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateOption`] when a long name is already
    /// taken anywhere in the merged surface.
    pub fn extend_config(
        &mut self,
        specs: impl IntoIterator<Item = OptionSpec>,
    ) -> Result<(), ConfigError> {
        for spec in specs {
            self.claim(spec.long())?;
            self.config.push(spec.clone());
            self.cli.push(spec);
        }
        Ok(())
    }

    /// Appends CLI-only options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateOption`] on a long-name collision.
    pub fn extend_cli(
        &mut self,
        specs: impl IntoIterator<Item = OptionSpec>,
    ) -> Result<(), ConfigError> {
        for spec in specs {
            self.claim(spec.long())?;
            self.cli.push(spec);
        }
        Ok(())
    }

    fn claim(&mut self, name: &str) -> Result<(), ConfigError> {
        if !self.names.insert(name.to_owned()) {
            return Err(ConfigError::DuplicateOption {
                name: name.to_owned(),
            });
        }
        Ok(())
    }

    /// Every option accepted on the command line.
    #[must_use]
    pub fn cli_options(&self) -> &[OptionSpec] {
        &self.cli
    }

    /// The options valid in the config file.
    #[must_use]
    pub fn config_options(&self) -> &[OptionSpec] {
        &self.config
    }

    /// Looks up a config-file option by long name.
    #[must_use]
    pub fn config_option(&self, name: &str) -> Option<&OptionSpec> {
        self.config.iter().find(|spec| spec.long() == name)
    }
}
