//! Shared test plugin that records lifecycle calls.

use std::cell::RefCell;
use std::rc::Rc;

use bosun_config::{OptionSpec, OptionsBuilder, ParsedOptions};
use bosun_plugins::{Plugin, PluginError, PluginState};

/// Shared log of lifecycle events, in call order.
pub(crate) type Journal = Rc<RefCell<Vec<String>>>;

/// Creates an empty journal.
pub(crate) fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

/// A plugin that appends `event:name` entries to a shared journal and can be
/// configured to fail individual lifecycle hooks.
pub(crate) struct RecordingPlugin {
    name: String,
    state: PluginState,
    journal: Journal,
    cli_specs: Vec<OptionSpec>,
    config_specs: Vec<OptionSpec>,
    fail_startup: bool,
    fail_shutdown: bool,
}

impl RecordingPlugin {
    pub(crate) fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_owned(),
            state: PluginState::Registered,
            journal: Rc::clone(journal),
            cli_specs: Vec::new(),
            config_specs: Vec::new(),
            fail_startup: false,
            fail_shutdown: false,
        }
    }

    pub(crate) fn with_config_option(mut self, spec: OptionSpec) -> Self {
        self.config_specs.push(spec);
        self
    }

    pub(crate) fn with_cli_option(mut self, spec: OptionSpec) -> Self {
        self.cli_specs.push(spec);
        self
    }

    pub(crate) fn failing_startup(mut self) -> Self {
        self.fail_startup = true;
        self
    }

    pub(crate) fn failing_shutdown(mut self) -> Self {
        self.fail_shutdown = true;
        self
    }

    pub(crate) fn boxed(self) -> Box<dyn Plugin> {
        Box::new(self)
    }

    fn log(&self, event: &str) {
        self.journal.borrow_mut().push(format!("{event}:{}", self.name));
    }
}

impl Plugin for RecordingPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> PluginState {
        self.state
    }

    fn describe_options(&self, cli: &mut OptionsBuilder, config: &mut OptionsBuilder) {
        for spec in &self.cli_specs {
            cli.push(spec.clone());
        }
        for spec in &self.config_specs {
            config.push(spec.clone());
        }
    }

    fn initialize(&mut self, options: &ParsedOptions) -> Result<(), PluginError> {
        self.log("init");
        for spec in &self.config_specs {
            if let Some(value) = options.value(spec.long()) {
                self.journal
                    .borrow_mut()
                    .push(format!("opt:{}={value}", spec.long()));
            }
        }
        self.state = PluginState::Initialized;
        Ok(())
    }

    fn startup(&mut self) -> Result<(), PluginError> {
        if self.fail_startup {
            return Err(PluginError::startup(self.name.as_str(), "configured to fail"));
        }
        self.log("start");
        self.state = PluginState::Started;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), PluginError> {
        if self.fail_shutdown {
            return Err(PluginError::shutdown(self.name.as_str(), "configured to fail"));
        }
        self.log("stop");
        Ok(())
    }
}
