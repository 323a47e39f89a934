//! Option schema and configuration layer for the Bosun plugin host.
//!
//! The `bosun-config` crate owns the unified configuration surface that the
//! host assembles from independently-authored plugins. Each plugin declares
//! its options into per-plugin [`OptionsBuilder`]s; the host merges those
//! declarations into one flat [`OptionSchema`] split between CLI-only options
//! and options that are also valid in the persisted config file.
//!
//! Parsing happens in two passes with strict precedence: the command line is
//! parsed first (via a `clap` command assembled at runtime from the schema),
//! then the INI-style config file fills in keys the command line left unset.
//! List-shaped options compose across both sources. Declared defaults backfill
//! whatever remains unset after both passes.
//!
//! The crate also materializes a default config file from the config schema
//! when none exists, so the first run of a host documents its own options.

pub mod error;
pub mod file;
pub mod parse;
pub mod schema;

pub use self::error::ConfigError;
pub use self::file::{apply_config_file, write_default_config};
pub use self::parse::{OptionValue, ParsedOptions, parse_command_line, render_help};
pub use self::schema::{OptionSchema, OptionSpec, OptionsBuilder, ValueShape};
