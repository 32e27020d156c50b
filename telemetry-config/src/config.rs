use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use telemetry_log::{Level, LogConfig};
use telemetry_sampling::SampleRate;
use thiserror::Error;

/// The default service tag of telemetry payloads.
pub const DEFAULT_SERVICE: &str = "dd-sdk-ios";

/// The default number of distinct telemetry events accepted per session.
pub const DEFAULT_MAX_EVENTS_PER_SESSION: usize = 100;

/// The default percentage of telemetry kept by each sampler.
pub const DEFAULT_SAMPLE_RATE: SampleRate = SampleRate::from_const(20.0);

const CONFIG_FILE_NAME: &str = "config.yml";

/// Defines the source of a config error
#[derive(Debug, Default)]
enum ConfigErrorSource {
    /// An error occurring independently.
    #[default]
    None,
    /// An error originating from a configuration file.
    File(PathBuf),
    /// An error originating in a field override (an env var, or a CLI parameter).
    FieldOverride(String),
}

/// Indicates config related errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum ConfigErrorKind {
    /// Failed to open the file.
    #[error("could not open config file")]
    CouldNotOpenFile,
    /// Failed to serialize the configuration.
    #[error("could not write config file")]
    CouldNotWriteFile,
    /// Parsing YAML failed.
    #[error("could not parse yaml config file")]
    BadYaml,
    /// Parsing JSON failed.
    #[error("could not parse json config file")]
    BadJson,
    /// Invalid config value.
    #[error("invalid config value")]
    InvalidValue,
}

/// Indicates config related errors.
#[derive(Debug)]
pub struct ConfigError {
    source: ConfigErrorSource,
    kind: ConfigErrorKind,
    cause: Option<Box<dyn Error + Send + Sync>>,
}

impl ConfigError {
    #[inline]
    fn new(kind: ConfigErrorKind) -> Self {
        Self {
            source: ConfigErrorSource::None,
            kind,
            cause: None,
        }
    }

    #[inline]
    fn wrap<E>(inner: E, kind: ConfigErrorKind) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            cause: Some(Box::new(inner)),
            ..Self::new(kind)
        }
    }

    #[inline]
    fn for_field<E>(inner: E, field: &'static str) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::wrap(inner, ConfigErrorKind::InvalidValue).field(field)
    }

    #[inline]
    fn file<P: AsRef<Path>>(mut self, p: P) -> Self {
        self.source = ConfigErrorSource::File(p.as_ref().to_path_buf());
        self
    }

    #[inline]
    fn field(mut self, name: &'static str) -> Self {
        self.source = ConfigErrorSource::FieldOverride(name.to_owned());
        self
    }

    /// Returns the error kind of the error.
    pub fn kind(&self) -> ConfigErrorKind {
        self.kind
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            ConfigErrorSource::None => self.kind.fmt(f),
            ConfigErrorSource::File(file_name) => {
                write!(f, "{} (file {})", self.kind, file_name.display())
            }
            ConfigErrorSource::FieldOverride(name) => write!(f, "{} (field {})", self.kind, name),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|cause| cause as &(dyn Error + 'static))
    }
}

/// Controls sampling and budgeting of the self-telemetry channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// The percentage of telemetry messages turned into events.
    ///
    /// Defaults to `20`.
    pub sample_rate: SampleRate,

    /// An additional percentage applied to configuration messages on top of `sample_rate`.
    ///
    /// Defaults to `20`.
    pub configuration_sample_rate: SampleRate,

    /// The maximum number of distinct telemetry events accepted per session.
    ///
    /// Must be greater than zero. Defaults to `100`.
    pub max_events_per_session: usize,

    /// The service tag written into every payload.
    pub service: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            configuration_sample_rate: DEFAULT_SAMPLE_RATE,
            max_events_per_session: DEFAULT_MAX_EVENTS_PER_SESSION,
            service: DEFAULT_SERVICE.to_owned(),
        }
    }
}

/// Values of the configuration file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct ConfigValues {
    logging: LogConfig,
    telemetry: TelemetryConfig,
}

impl ConfigValues {
    /// The full filename of the config file within the given directory.
    fn path(base: &Path) -> PathBuf {
        base.join(CONFIG_FILE_NAME)
    }

    /// Loads the config file from a file within the given directory location.
    fn load(base: &Path) -> Result<Self, ConfigError> {
        let path = Self::path(base);

        let f = fs::File::open(&path)
            .map_err(|e| ConfigError::wrap(e, ConfigErrorKind::CouldNotOpenFile).file(&path))?;

        serde_yaml::from_reader(io::BufReader::new(f))
            .map_err(|e| ConfigError::wrap(e, ConfigErrorKind::BadYaml).file(&path))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let telemetry = &self.telemetry;

        if telemetry.max_events_per_session == 0 {
            return Err(
                ConfigError::new(ConfigErrorKind::InvalidValue).field("max_events_per_session")
            );
        }

        if telemetry.service.trim().is_empty() {
            return Err(ConfigError::new(ConfigErrorKind::InvalidValue).field("service"));
        }

        Ok(())
    }
}

/// Structure used to hold information about configuration overrides via
/// CLI parameters or environment variables
#[derive(Debug, Default)]
pub struct OverridableConfig {
    /// The telemetry sample rate.
    pub sample_rate: Option<String>,
    /// The extra sample rate for configuration telemetry.
    pub configuration_sample_rate: Option<String>,
    /// The per-session event budget.
    pub max_events_per_session: Option<String>,
    /// The service tag.
    pub service: Option<String>,
    /// The log level.
    pub log_level: Option<String>,
}

impl OverridableConfig {
    /// Reads overrides from the `TELEMETRY_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads overrides through the given lookup of variable names.
    pub fn from_lookup<F>(mut lookup: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        Self {
            sample_rate: lookup("TELEMETRY_SAMPLE_RATE"),
            configuration_sample_rate: lookup("TELEMETRY_CONFIGURATION_SAMPLE_RATE"),
            max_events_per_session: lookup("TELEMETRY_MAX_EVENTS_PER_SESSION"),
            service: lookup("TELEMETRY_SERVICE"),
            log_level: lookup("TELEMETRY_LOG_LEVEL"),
        }
    }
}

/// Configuration of the self-telemetry channel.
#[derive(Debug, Default)]
pub struct Config {
    values: ConfigValues,
    path: PathBuf,
}

impl Config {
    /// Loads the configuration from `config.yml` in the given directory.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = std::env::current_dir()
            .map(|x| x.join(path.as_ref()))
            .unwrap_or_else(|_| path.as_ref().to_path_buf());

        let config = Config {
            values: ConfigValues::load(&path)?,
            path: path.clone(),
        };

        config
            .values
            .validate()
            .map_err(|e| e.file(ConfigValues::path(&path)))?;
        telemetry_log::debug!("loaded configuration from {}", path.display());

        Ok(config)
    }

    /// Creates a config from a JSON value.
    ///
    /// This is mostly useful for tests.
    pub fn from_json_value(value: serde_json::Value) -> Result<Config, ConfigError> {
        let config = Config {
            values: serde_json::from_value(value)
                .map_err(|err| ConfigError::wrap(err, ConfigErrorKind::BadJson))?,
            path: PathBuf::new(),
        };

        config.values.validate()?;
        Ok(config)
    }

    /// Override configuration with values coming from other sources (e.g. env variables or
    /// command line parameters)
    ///
    /// Either all overrides are applied or, on error, the configuration stays unchanged.
    pub fn apply_override(
        &mut self,
        overrides: OverridableConfig,
    ) -> Result<&mut Self, ConfigError> {
        let mut values = self.values.clone();
        let telemetry = &mut values.telemetry;

        if let Some(sample_rate) = overrides.sample_rate {
            telemetry.sample_rate = sample_rate
                .parse()
                .map_err(|err| ConfigError::for_field(err, "sample_rate"))?;
        }

        if let Some(sample_rate) = overrides.configuration_sample_rate {
            telemetry.configuration_sample_rate = sample_rate
                .parse()
                .map_err(|err| ConfigError::for_field(err, "configuration_sample_rate"))?;
        }

        if let Some(max_events) = overrides.max_events_per_session {
            telemetry.max_events_per_session = max_events
                .trim()
                .parse()
                .map_err(|err| ConfigError::for_field(err, "max_events_per_session"))?;
        }

        if let Some(service) = overrides.service {
            telemetry.service = service;
        }

        if let Some(level) = overrides.log_level {
            values.logging.level =
                serde_json::from_value::<Level>(serde_json::Value::String(level))
                    .map_err(|err| ConfigError::for_field(err, "log_level"))?;
        }

        values.validate()?;
        self.values = values;
        Ok(self)
    }

    /// Checks whether a config file exists in the given directory.
    pub fn config_exists<P: AsRef<Path>>(path: P) -> bool {
        fs::metadata(ConfigValues::path(path.as_ref())).is_ok()
    }

    /// Returns the directory the configuration was loaded from.
    ///
    /// Empty if the configuration was not loaded from a file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Dumps out a YAML string of the values.
    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(&self.values)
            .map_err(|e| ConfigError::wrap(e, ConfigErrorKind::CouldNotWriteFile))
    }

    /// Returns the logging configuration.
    pub fn logging(&self) -> &LogConfig {
        &self.values.logging
    }

    /// Returns the telemetry configuration.
    pub fn telemetry(&self) -> &TelemetryConfig {
        &self.values.telemetry
    }
}
