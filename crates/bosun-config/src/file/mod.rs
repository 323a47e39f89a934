//! INI-style config file reading and default-file materialization.
//!
//! The file format is one `key = value` pair per line with `#` comment
//! lines; values are bare words, so the format is read with a small
//! hand-written parser rather than a TOML document. The materializer writes
//! one commented block per config option so a fresh data directory documents
//! the host's full config surface.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::ConfigError;
use crate::parse::{ParsedOptions, split_list_entry};
use crate::schema::{OptionSchema, OptionSpec, ValueShape};

const CONFIG_TARGET: &str = "bosun_config::file";

/// Writes a default config file derived from the config schema.
///
/// Creates missing parent directories. Existing files are never touched;
/// the return value reports whether a file was written. Each option renders
/// as a `# description` comment (omitted when empty) followed by
/// `name = default`; switches without a declared default render `false`, and
/// options with no renderable default render as a commented `# name =` line.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when directory creation or the write fails.
pub fn write_default_config(
    path: &Path,
    config_options: &[OptionSpec],
) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::io(parent, source))?;
    }

    let mut rendered = String::new();
    for spec in config_options {
        if !spec.description().is_empty() {
            rendered.push_str(&format!("# {}\n", spec.description()));
        }
        match spec.shape() {
            ValueShape::Switch => {
                rendered.push_str(&format!("{} = false\n", spec.long()));
            }
            ValueShape::Value {
                default: Some(default),
            } => {
                rendered.push_str(&format!("{} = {default}\n", spec.long()));
            }
            ValueShape::Value { default: None } | ValueShape::List => {
                rendered.push_str(&format!("# {} = \n", spec.long()));
            }
        }
        rendered.push('\n');
    }

    fs::write(path, rendered).map_err(|source| ConfigError::io(path, source))?;
    Ok(true)
}

/// Reads a config file and fills in options the command line left unset.
///
/// Command-line precedence is preserved: scalar keys already present in
/// `options` keep their value, list keys compose. Keys not present in the
/// config schema are ignored with a warning, so stale entries left behind by
/// a disabled plugin do not break the host.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when the file cannot be read,
/// [`ConfigError::MalformedLine`] for lines that are not comments, blanks, or
/// `key = value` pairs, and [`ConfigError::InvalidValue`] when a switch holds
/// anything other than `true` or `false`.
pub fn apply_config_file(
    path: &Path,
    schema: &OptionSchema,
    options: &mut ParsedOptions,
) -> Result<(), ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::io(path, source))?;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key_raw, value_raw)) = line.split_once('=') else {
            return Err(ConfigError::MalformedLine {
                path: path.to_owned(),
                line: index + 1,
                content: line.to_owned(),
            });
        };
        let key = key_raw.trim();
        let value = value_raw.trim();

        let Some(spec) = schema.config_option(key) else {
            warn!(target: CONFIG_TARGET, key, "ignoring unknown config entry");
            continue;
        };
        match spec.shape() {
            ValueShape::Switch => {
                let switched = match value {
                    "true" => true,
                    "false" => false,
                    _ => {
                        return Err(ConfigError::InvalidValue {
                            name: key.to_owned(),
                            value: value.to_owned(),
                        });
                    }
                };
                options.set_switch(key, switched);
            }
            ValueShape::Value { .. } => {
                options.insert_text(key, value);
            }
            ValueShape::List => {
                options.extend_list(key, split_list_entry(value));
            }
        }
    }
    Ok(())
}
