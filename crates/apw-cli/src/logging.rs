//! `tracing` subscriber setup for `packup`.
//!
//! Events from the `apw_*` crates follow the requested level; dependencies
//! stay at `warn`. Path collisions and skipped descriptors log at `warn`,
//! pipeline stages at `info`, per-file resolution at `debug`.
//!
//! ```ignore
//! use apw_cli::logging::{LogConfig, init_logging};
//!
//! let config = LogConfig {
//!     level_filter: LevelFilter::DEBUG,
//!     ..LogConfig::default()
//! };
//! init_logging(&config)?;
//! ```

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::{self, writer::BoxMakeWriter};
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Crates whose events follow the configured level.
const OWN_CRATES: [&str; 4] = ["apw_cli", "apw_core", "apw_model", "apw_xml"];

type Filtered = Layered<EnvFilter, Registry>;
type OutputLayer = Box<dyn Layer<Filtered> + Send + Sync>;

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level for this workspace's crates.
    pub level_filter: LevelFilter,
    /// Whether `RUST_LOG` may replace the level directives.
    pub use_env_filter: bool,
    /// Prefix text records with the time. JSON records always carry one.
    pub timestamps: bool,
    pub ansi: bool,
    pub format: LogFormat,
    /// Append to this file instead of writing to stderr.
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-field human format.
    #[default]
    Pretty,
    /// One short line per event.
    Compact,
    /// Newline-delimited JSON.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            timestamps: false,
            ansi: true,
            format: LogFormat::default(),
            log_file: None,
        }
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails if the log file cannot be opened or a subscriber is already set.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    let writer = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(io::stderr),
    };
    tracing_subscriber::registry()
        .with(build_env_filter(config))
        .with(output_layer(config, writer))
        .try_init()
        .map_err(io::Error::other)
}

fn output_layer(config: &LogConfig, writer: BoxMakeWriter) -> OutputLayer {
    let layer = fmt::layer().with_writer(writer);
    match (config.format, config.timestamps) {
        (LogFormat::Json, _) => layer.json().with_target(true).boxed(),
        (LogFormat::Compact, true) => layer
            .compact()
            .with_ansi(config.ansi)
            .with_target(false)
            .boxed(),
        (LogFormat::Compact, false) => layer
            .compact()
            .with_ansi(config.ansi)
            .with_target(false)
            .without_time()
            .boxed(),
        (LogFormat::Pretty, true) => layer.with_ansi(config.ansi).with_target(false).boxed(),
        (LogFormat::Pretty, false) => layer
            .with_ansi(config.ansi)
            .with_target(false)
            .without_time()
            .boxed(),
    }
}

fn default_directives(level_filter: LevelFilter) -> String {
    let level = level_filter.to_string().to_lowercase();
    let mut directives = vec![LevelFilter::WARN.min(level_filter).to_string().to_lowercase()];
    directives.extend(OWN_CRATES.iter().map(|krate| format!("{krate}={level}")));
    directives.join(",")
}

fn build_env_filter(config: &LogConfig) -> EnvFilter {
    let directives = default_directives(config.level_filter);
    if config.use_env_filter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
    } else {
        EnvFilter::new(directives)
    }
}
