//! Unit tests for the host application and lifecycle orchestrator.

use std::ffi::OsString;

use rstest::rstest;
use tempfile::TempDir;

use super::{Application, InitControl};
use crate::errors::HostError;
use crate::tests::support::{Journal, RecordingPlugin, journal};
use bosun_config::{ConfigError, OptionSpec, ParsedOptions};
use bosun_plugins::{PluginError, PluginState};

fn args(items: &[&str]) -> Vec<OsString> {
    std::iter::once("bosund")
        .chain(items.iter().copied())
        .map(OsString::from)
        .collect()
}

fn app_with_plugins(log: &Journal) -> Application {
    let mut app = Application::new("bosund", "0.1.0");
    app.register_plugin(
        RecordingPlugin::new("alpha", log)
            .with_config_option(
                OptionSpec::value("alpha-greeting", "Greeting alpha announces").with_default("hello"),
            )
            .boxed(),
    )
    .expect("register alpha");
    app.register_plugin(
        RecordingPlugin::new("beta", log)
            .with_cli_option(OptionSpec::switch("beta-trace", "Trace beta's work"))
            .boxed(),
    )
    .expect("register beta");
    app.register_plugin(RecordingPlugin::new("gamma", log).boxed())
        .expect("register gamma");
    app
}

fn data_dir_args(dir: &TempDir, extra: &[&str]) -> Vec<OsString> {
    let dir_arg = dir.path().to_str().expect("utf8 temp path").to_owned();
    let mut items = vec!["--data-dir".to_owned(), dir_arg];
    items.extend(extra.iter().map(|item| (*item).to_owned()));
    args(&items.iter().map(String::as_str).collect::<Vec<_>>())
}

// ---------------------------------------------------------------------------
// Bootstrap short-circuits
// ---------------------------------------------------------------------------

#[test]
fn help_prints_merged_schema_without_lifecycle_calls() {
    let log = journal();
    let mut app = app_with_plugins(&log);
    let mut out = Vec::new();

    let control = app
        .initialize(args(&["--help"]), &[], &mut out)
        .expect("initialize");
    assert_eq!(control, InitControl::Exit);

    let help = String::from_utf8(out).expect("utf8 help");
    for flag in ["--alpha-greeting", "--beta-trace", "--plugin", "--data-dir", "--config"] {
        assert!(help.contains(flag), "help should mention {flag}");
    }
    // Only describe-options hooks ran; no plugin was initialized.
    assert!(log.borrow().iter().all(|entry| !entry.starts_with("init")));
    assert!(app.registry().initialized_order().is_empty());
}

#[test]
fn version_prints_name_and_version() {
    let log = journal();
    let mut app = app_with_plugins(&log);
    let mut out = Vec::new();

    let control = app
        .initialize(args(&["-v"]), &[], &mut out)
        .expect("initialize");
    assert_eq!(control, InitControl::Exit);
    assert_eq!(String::from_utf8(out).expect("utf8"), "bosund 0.1.0\n");
}

#[test]
fn colliding_plugin_options_abort_before_any_file_is_written() {
    let log = journal();
    let mut app = Application::new("bosund", "0.1.0");
    app.register_plugin(
        RecordingPlugin::new("alpha", &log)
            .with_config_option(OptionSpec::value("shared-name", ""))
            .boxed(),
    )
    .expect("register alpha");
    app.register_plugin(
        RecordingPlugin::new("beta", &log)
            .with_config_option(OptionSpec::value("shared-name", ""))
            .boxed(),
    )
    .expect("register beta");

    let dir = TempDir::new().expect("tempdir");
    let mut out = Vec::new();
    let err = app
        .initialize(data_dir_args(&dir, &[]), &[], &mut out)
        .expect_err("collision");
    assert!(matches!(
        err,
        HostError::Config(ConfigError::DuplicateOption { ref name }) if name == "shared-name"
    ));
    assert!(
        std::fs::read_dir(dir.path()).expect("read dir").next().is_none(),
        "no config file may be written after a schema error"
    );
}

// ---------------------------------------------------------------------------
// Bootstrap happy path
// ---------------------------------------------------------------------------

#[test]
fn bootstrap_materializes_config_and_initializes_selected_plugins() {
    let log = journal();
    let mut app = app_with_plugins(&log);
    let dir = TempDir::new().expect("tempdir");
    let mut out = Vec::new();

    let control = app
        .initialize(data_dir_args(&dir, &["--plugin", "alpha,beta"]), &["gamma"], &mut out)
        .expect("initialize");
    assert_eq!(control, InitControl::Proceed);

    let config_path = dir.path().join("config.ini");
    assert_eq!(app.config_path(), config_path);
    assert_eq!(app.data_dir(), dir.path());
    let config_text = std::fs::read_to_string(&config_path).expect("config written");
    assert!(config_text.contains("alpha-greeting = hello"));
    assert!(config_text.contains("# plugin = "));

    // Requested plugins first, in list order, then autostart.
    assert_eq!(app.registry().initialized_order(), ["alpha", "beta", "gamma"]);
    assert_eq!(app.plugin_state("alpha"), Some(PluginState::Initialized));
    assert!(app.options().is_some());
    assert!(app.schema().is_some());
}

#[test]
fn config_file_can_enable_plugins() {
    let log = journal();
    let mut app = app_with_plugins(&log);
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("config.ini"), "plugin = alpha\n").expect("write config");

    let mut out = Vec::new();
    app.initialize(data_dir_args(&dir, &[]), &[], &mut out)
        .expect("initialize");
    assert_eq!(app.registry().initialized_order(), ["alpha"]);
}

#[rstest]
#[case::declared_default(&[], "hello")]
#[case::cli_override(&["--alpha-greeting", "ahoy"], "ahoy")]
fn plugin_initialize_sees_resolved_option_values(
    #[case] extra: &[&str],
    #[case] expected: &str,
) {
    let log = journal();
    let mut app = app_with_plugins(&log);
    let dir = TempDir::new().expect("tempdir");

    let mut items = vec!["--plugin", "alpha"];
    items.extend_from_slice(extra);
    let mut out = Vec::new();
    app.initialize(data_dir_args(&dir, &items), &[], &mut out)
        .expect("initialize");

    assert!(
        log.borrow().contains(&format!("opt:alpha-greeting={expected}")),
        "alpha should observe '{expected}', journal: {:?}",
        log.borrow()
    );
}

#[test]
fn custom_config_name_resolves_against_data_dir() {
    let log = journal();
    let mut app = app_with_plugins(&log);
    let dir = TempDir::new().expect("tempdir");

    let mut out = Vec::new();
    app.initialize(data_dir_args(&dir, &["--config", "custom.ini"]), &[], &mut out)
        .expect("initialize");
    assert_eq!(app.config_path(), dir.path().join("custom.ini"));
    assert!(dir.path().join("custom.ini").exists());
}

#[test]
fn unknown_requested_plugin_is_not_found() {
    let log = journal();
    let mut app = app_with_plugins(&log);
    let dir = TempDir::new().expect("tempdir");

    let mut out = Vec::new();
    let err = app
        .initialize(data_dir_args(&dir, &["--plugin", "absent"]), &[], &mut out)
        .expect_err("unknown plugin");
    assert!(matches!(
        err,
        HostError::Plugin(PluginError::NotFound { ref name }) if name == "absent"
    ));
}

#[test]
fn unregistered_autostart_names_are_skipped() {
    let log = journal();
    let mut app = app_with_plugins(&log);
    let dir = TempDir::new().expect("tempdir");

    let mut out = Vec::new();
    app.initialize(data_dir_args(&dir, &[]), &["absent", "gamma"], &mut out)
        .expect("initialize");
    assert_eq!(app.registry().initialized_order(), ["gamma"]);
}

// ---------------------------------------------------------------------------
// Lifecycle ordering
// ---------------------------------------------------------------------------

#[test]
fn repeated_initialize_is_a_no_op() {
    let log = journal();
    let mut app = app_with_plugins(&log);
    let options = ParsedOptions::new();

    app.initialize_plugin("alpha", &options).expect("first");
    app.initialize_plugin("alpha", &options).expect("second");

    assert_eq!(app.registry().initialized_order(), ["alpha"]);
    assert_eq!(
        log.borrow().iter().filter(|entry| *entry == "init:alpha").count(),
        1
    );
}

#[test]
fn startup_follows_initialization_order_and_shutdown_reverses_it() {
    let log = journal();
    let mut app = app_with_plugins(&log);
    let options = ParsedOptions::new();

    for name in ["gamma", "alpha", "beta"] {
        app.initialize_plugin(name, &options).expect("initialize");
    }
    app.startup().expect("startup");
    assert_eq!(app.registry().started_order(), ["gamma", "alpha", "beta"]);

    app.shutdown();
    assert_eq!(
        *log.borrow(),
        [
            "init:gamma",
            "init:alpha",
            "init:beta",
            "start:gamma",
            "start:alpha",
            "start:beta",
            "stop:beta",
            "stop:alpha",
            "stop:gamma",
        ]
    );
    assert!(app.registry().is_empty());
    assert_eq!(app.plugin_state("alpha"), None);
}

#[test]
fn second_shutdown_performs_no_plugin_calls() {
    let log = journal();
    let mut app = app_with_plugins(&log);
    let options = ParsedOptions::new();
    app.initialize_plugin("alpha", &options).expect("initialize");
    app.startup().expect("startup");

    app.shutdown();
    let entries_after_first = log.borrow().len();
    app.shutdown();
    assert_eq!(log.borrow().len(), entries_after_first);
}

#[test]
fn repeated_startup_skips_already_started_plugins() {
    let log = journal();
    let mut app = app_with_plugins(&log);
    let options = ParsedOptions::new();
    app.initialize_plugin("alpha", &options).expect("initialize");

    app.startup().expect("first startup");
    app.startup().expect("second startup");
    assert_eq!(app.registry().started_order(), ["alpha"]);
    assert_eq!(
        log.borrow().iter().filter(|entry| *entry == "start:alpha").count(),
        1
    );
}

#[test]
fn startup_failure_aborts_remaining_sequence_without_rollback() {
    let log = journal();
    let mut app = Application::new("bosund", "0.1.0");
    app.register_plugin(RecordingPlugin::new("alpha", &log).boxed())
        .expect("register alpha");
    app.register_plugin(RecordingPlugin::new("beta", &log).failing_startup().boxed())
        .expect("register beta");
    app.register_plugin(RecordingPlugin::new("gamma", &log).boxed())
        .expect("register gamma");

    let options = ParsedOptions::new();
    for name in ["alpha", "beta", "gamma"] {
        app.initialize_plugin(name, &options).expect("initialize");
    }

    let err = app.startup().expect_err("beta fails");
    assert!(matches!(
        err,
        HostError::Plugin(PluginError::Startup { ref name, .. }) if name == "beta"
    ));
    // alpha stays started, gamma was never reached.
    assert_eq!(app.registry().started_order(), ["alpha"]);
    assert_eq!(app.plugin_state("gamma"), Some(PluginState::Initialized));
}

#[test]
fn shutdown_failure_does_not_stop_the_sweep() {
    let log = journal();
    let mut app = Application::new("bosund", "0.1.0");
    app.register_plugin(RecordingPlugin::new("alpha", &log).boxed())
        .expect("register alpha");
    app.register_plugin(RecordingPlugin::new("beta", &log).failing_shutdown().boxed())
        .expect("register beta");
    app.register_plugin(RecordingPlugin::new("gamma", &log).boxed())
        .expect("register gamma");

    let options = ParsedOptions::new();
    for name in ["alpha", "beta", "gamma"] {
        app.initialize_plugin(name, &options).expect("initialize");
    }
    app.startup().expect("startup");

    app.shutdown();
    // gamma and alpha still shut down around the failing beta.
    let entries = log.borrow();
    assert!(entries.contains(&"stop:gamma".to_owned()));
    assert!(entries.contains(&"stop:alpha".to_owned()));
    assert!(!entries.contains(&"stop:beta".to_owned()));
    drop(entries);
    assert!(app.registry().is_empty());
}
