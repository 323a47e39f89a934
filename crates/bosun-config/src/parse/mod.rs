//! Command-line parsing over the runtime-assembled schema.
//!
//! The schema is only known once every plugin has declared its options, so
//! the `clap` command is assembled with the builder API rather than derive.
//! Parsing yields a [`ParsedOptions`] map; the config file and declared
//! defaults later fill in keys the command line left unset.

use std::collections::HashMap;
use std::ffi::OsString;

use clap::{Arg, ArgAction, Command};

use crate::error::ConfigError;
use crate::schema::{OptionSchema, OptionSpec, ValueShape};

const EMPTY_LIST: &[String] = &[];

/// A resolved option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// A boolean switch.
    Switch(bool),
    /// A single textual value.
    Text(String),
    /// Accumulated entries of a repeatable option.
    List(Vec<String>),
}

/// Option values resolved from the command line, config file, and defaults.
///
/// Scalar keys follow strict precedence: a key set by an earlier source is
/// never overwritten by a later one. List keys compose across sources.
#[derive(Debug, Clone, Default)]
pub struct ParsedOptions {
    values: HashMap<String, OptionValue>,
}

impl ParsedOptions {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when any source set the option.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Reads a switch; absent switches read as `false`.
    #[must_use]
    pub fn switch(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(OptionValue::Switch(true)))
    }

    /// Reads a single textual value.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(OptionValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Reads the accumulated entries of a list option; absent lists are empty.
    #[must_use]
    pub fn values(&self, name: &str) -> &[String] {
        match self.values.get(name) {
            Some(OptionValue::List(items)) => items,
            _ => EMPTY_LIST,
        }
    }

    /// Sets a switch unless the key is already set.
    pub fn set_switch(&mut self, name: &str, value: bool) {
        self.values
            .entry(name.to_owned())
            .or_insert(OptionValue::Switch(value));
    }

    /// Sets a textual value unless the key is already set.
    pub fn insert_text(&mut self, name: &str, value: impl Into<String>) {
        self.values
            .entry(name.to_owned())
            .or_insert_with(|| OptionValue::Text(value.into()));
    }

    /// Appends entries to a list option, creating it on first use.
    pub fn extend_list(&mut self, name: &str, entries: impl IntoIterator<Item = String>) {
        let slot = self
            .values
            .entry(name.to_owned())
            .or_insert_with(|| OptionValue::List(Vec::new()));
        if let OptionValue::List(items) = slot {
            items.extend(entries);
        }
    }

    /// Backfills declared defaults for options no source set.
    pub fn apply_defaults(&mut self, schema: &OptionSchema) {
        for spec in schema.cli_options() {
            if let Some(default) = spec.default_value() {
                self.insert_text(spec.long(), default);
            }
        }
    }
}

/// Splits one raw occurrence of a list option into its entries.
///
/// Entries separate on commas, spaces, or tabs, matching the accepted
/// `--plugin a,b` and `plugin = a b` spellings.
pub(crate) fn split_list_entry(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split([',', ' ', '\t'])
        .filter(|entry| !entry.is_empty())
        .map(ToOwned::to_owned)
}

fn to_arg(spec: &OptionSpec) -> Arg {
    let mut arg = Arg::new(spec.long().to_owned())
        .long(spec.long().to_owned())
        .help(spec.description().to_owned());
    if let Some(short) = spec.short() {
        arg = arg.short(short);
    }
    match spec.shape() {
        ValueShape::Switch => arg.action(ArgAction::SetTrue),
        ValueShape::Value { .. } => arg.action(ArgAction::Set).value_name("VALUE"),
        ValueShape::List => arg.action(ArgAction::Append).value_name("NAME"),
    }
}

fn build_command(bin_name: &str, schema: &OptionSchema) -> Command {
    let mut command = Command::new(bin_name.to_owned())
        .disable_help_flag(true)
        .disable_version_flag(true);
    for spec in schema.cli_options() {
        command = command.arg(to_arg(spec));
    }
    command
}

/// Renders the merged option surface as help text.
#[must_use]
pub fn render_help(bin_name: &str, schema: &OptionSchema) -> String {
    build_command(bin_name, schema).render_help().to_string()
}

/// Parses the command line against the finalized schema.
///
/// The first argument is the binary name, as produced by `std::env::args_os`.
/// Unknown flags are rejected by `clap`.
///
/// # Errors
///
/// Returns [`ConfigError::Cli`] when the arguments do not match the schema.
pub fn parse_command_line(
    bin_name: &str,
    schema: &OptionSchema,
    args: impl IntoIterator<Item = OsString>,
) -> Result<ParsedOptions, ConfigError> {
    let matches = build_command(bin_name, schema)
        .try_get_matches_from(args)
        .map_err(|source| ConfigError::Cli(Box::new(source)))?;

    let mut options = ParsedOptions::new();
    for spec in schema.cli_options() {
        match spec.shape() {
            ValueShape::Switch => {
                if matches.get_flag(spec.long()) {
                    options.set_switch(spec.long(), true);
                }
            }
            ValueShape::Value { .. } => {
                if let Some(value) = matches.get_one::<String>(spec.long()) {
                    options.insert_text(spec.long(), value.clone());
                }
            }
            ValueShape::List => {
                if let Some(occurrences) = matches.get_many::<String>(spec.long()) {
                    for raw in occurrences {
                        options.extend_list(spec.long(), split_list_entry(raw));
                    }
                }
            }
        }
    }
    Ok(options)
}
