use crate::{
    cli::Cli,
    error::{DecapError, DecapResult},
    render::OutputFormat,
};
use config::{Config, Environment, File};
use s7_decap_core::SelectionPolicy;
use serde::Deserialize;
use std::path::PathBuf;

/// Settings file looked up in the working directory when `-c` is not given
pub const DEFAULT_CONFIG_FILE_NAME: &str = "s7-decap.toml";

/// Run options. Sources, lowest precedence first: settings file,
/// `S7DECAP__*` environment variables, command line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Capture file
    #[serde(default)]
    pub source: Option<PathBuf>,
    #[serde(default)]
    pub stop_after_first_match: bool,
    #[serde(default)]
    pub only_packet_index: Option<usize>,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub format: OutputFormat,
    /// Capacity of the capture -> dissector queue
    #[serde(default = "Settings::queue_depth_default")]
    pub queue_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            source: None,
            stop_after_first_match: false,
            only_packet_index: None,
            verbose: false,
            format: OutputFormat::default(),
            queue_depth: Settings::queue_depth_default(),
        }
    }
}

impl Settings {
    fn queue_depth_default() -> usize {
        1024
    }

    pub fn load(cli: &Cli) -> DecapResult<Self> {
        Self::load_with(cli, Self::environment())
    }

    /// Environment source: `S7DECAP__QUEUE_DEPTH=64`, `S7DECAP__FORMAT=json`...
    pub fn environment() -> Environment {
        Environment::with_prefix("S7DECAP")
            .separator("__")
            .try_parsing(true)
    }

    pub fn load_with(cli: &Cli, env: Environment) -> DecapResult<Self> {
        // An explicit settings file must exist, the default one is optional
        let file = match &cli.config {
            Some(path) => File::from(path.as_path()).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE_NAME).required(false),
        };
        let mut settings: Settings = Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()?;
        settings.apply_cli(cli);
        settings.validate()?;
        Ok(settings)
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(source) = &cli.source {
            self.source = Some(source.clone());
        }
        if cli.first {
            self.stop_after_first_match = true;
        }
        if let Some(packet) = cli.packet {
            self.only_packet_index = Some(packet);
        }
        if cli.verbose {
            self.verbose = true;
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
        if let Some(depth) = cli.queue_depth {
            self.queue_depth = depth;
        }
    }

    pub fn validate(&self) -> DecapResult<()> {
        if self.source.is_none() {
            return Err(DecapError::ConfigurationError(
                "no capture source, pass -r/--read or set `source`".to_string(),
            ));
        }
        if self.queue_depth == 0 {
            return Err(DecapError::ConfigurationError(
                "queue_depth must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn selection_policy(&self) -> SelectionPolicy {
        SelectionPolicy {
            stop_after_first_match: self.stop_after_first_match,
            only_packet_index: self.only_packet_index,
        }
    }
}
