use std::fmt;

use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::Layered;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt as format};

// Import CRATE_NAMES, which lists all crates in the workspace.
include!(concat!(env!("OUT_DIR"), "/constants.gen.rs"));

/// Controls the log format.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Auto detect the best format.
    ///
    /// This chooses [`LogFormat::Pretty`] for TTY, otherwise [`LogFormat::Simplified`].
    #[default]
    Auto,

    /// Pretty printing with colors.
    ///
    /// ```text
    ///  INFO telemetry_config: loaded configuration
    /// ```
    Pretty,

    /// Simplified plain text output.
    ///
    /// ```text
    /// 2024-12-04T12:10:32.123456Z  INFO telemetry_config: loaded configuration
    /// ```
    Simplified,

    /// Dump out JSON lines.
    ///
    /// ```text
    /// {"timestamp":"2024-12-04T12:11:08.729716Z","level":"INFO","message":"loaded configuration","target":"telemetry_config"}
    /// ```
    Json,
}

/// The logging level parsed from configuration.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Disables all logging.
    Off,
    /// Only errors.
    Error,
    /// Errors and warnings.
    Warn,
    /// Messages relevant to the average user.
    #[default]
    Info,
    /// Messages usually relevant to debugging.
    Debug,
    /// Full auxiliary information.
    Trace,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Off => "off",
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        };
        f.write_str(name)
    }
}

/// Controls the logging system.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// The log level for the workspace crates.
    pub level: Level,

    /// Controls the log output format.
    ///
    /// Defaults to [`LogFormat::Auto`], which detects the best format based on the TTY.
    pub format: LogFormat,
}

/// Builds the filter directives used when `RUST_LOG` is not set.
///
/// Third-party crates log at INFO at most, all workspace crates at the configured level.
fn default_directives(level: Level) -> String {
    let third_party = level.min(Level::Info);
    let mut directives = third_party.to_string();

    for name in CRATE_NAMES {
        directives.push_str(&format!(",{name}={level}"));
    }

    directives
}

type FormatLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

/// Initialize the logging system.
///
/// Honors the `RUST_LOG` environment variable if it is set. Otherwise, filters are derived from
/// [`LogConfig::level`]. Calling this more than once has no effect.
///
/// # Example
///
/// ```
/// let log_config = telemetry_log::LogConfig::default();
/// telemetry_log::init(&log_config);
/// ```
pub fn init(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config.level)));

    let format: FormatLayer = match (config.format, console::user_attended()) {
        (LogFormat::Auto, true) | (LogFormat::Pretty, _) => format::layer()
            .with_target(true)
            .with_ansi(true)
            .compact()
            .boxed(),
        (LogFormat::Auto, false) | (LogFormat::Simplified, _) => {
            format::layer().with_ansi(false).boxed()
        }
        (LogFormat::Json, _) => format::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .try_init()
        .ok();
}
