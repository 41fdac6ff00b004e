//! Logging setup for the Folio site CMS.
//!
//! One subscriber with up to two outputs: the console, in JSON lines,
//! pretty or compact form, and rolling JSON-lines files. Each output can
//! filter at its own level. `RUST_LOG`, when set, replaces every
//! configured filter.
//!
//! ```ignore
//! use folio_logging::{FolioSubscriberBuilder, LogConfig};
//!
//! let _guard = FolioSubscriberBuilder::new()
//!     .with_config(LogConfig::development())
//!     .init()?;
//! ```

pub mod config;

pub use config::{ConsoleOutput, FileOutput, JsonFields, LogConfig, LogFormat, Rotation};

use std::io;

use thiserror::Error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// A type-erased output layer
pub type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Cannot open log directory {path}: {source}")]
    LogDir { path: String, source: io::Error },

    #[error("Cannot start file appender: {0}")]
    Appender(String),

    #[error("Invalid log filter `{filter}`: {reason}")]
    Filter { filter: String, reason: String },

    #[error("A global tracing subscriber is already set")]
    AlreadyInitialized,
}

/// Holds whatever must outlive the subscriber's outputs
#[must_use = "dropping the guard stops file logging"]
#[derive(Debug, Default)]
pub struct LogGuard {
    file: Option<WorkerGuard>,
}

impl LogGuard {
    /// Whether a file output is being flushed by this guard
    pub fn writes_files(&self) -> bool {
        self.file.is_some()
    }
}

/// Builds and installs the Folio subscriber
#[derive(Debug, Clone, Default)]
pub struct FolioSubscriberBuilder {
    config: LogConfig,
}

impl FolioSubscriberBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the base level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.level = level.into();
        self
    }

    pub fn with_console_format(mut self, format: LogFormat) -> Self {
        self.config.console.format = format;
        self
    }

    pub fn without_console(mut self) -> Self {
        self.config.console.enabled = false;
        self
    }

    pub fn with_files(mut self, file: FileOutput) -> Self {
        self.config.file = Some(file);
        self
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    fn filter(&self, level: Option<&str>) -> Result<EnvFilter, LoggingError> {
        if let Ok(from_env) = EnvFilter::try_from_default_env() {
            return Ok(from_env);
        }
        let filter = self.config.filter_for(level);
        EnvFilter::try_new(&filter).map_err(|e| LoggingError::Filter {
            filter,
            reason: e.to_string(),
        })
    }

    fn json<W>(&self, writer: W) -> BoxedLayer
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let fields = &self.config.json;
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(fields.flatten)
            .with_current_span(fields.spans)
            .with_span_list(fields.spans)
            .with_file(fields.location)
            .with_line_number(fields.location)
            .with_writer(writer)
            .boxed()
    }

    fn console(&self) -> BoxedLayer {
        let console = &self.config.console;
        match console.format {
            LogFormat::Json => self.json(io::stdout),
            LogFormat::Pretty => tracing_subscriber::fmt::layer()
                .pretty()
                .with_ansi(console.ansi)
                .boxed(),
            LogFormat::Compact => tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(console.ansi)
                .with_target(false)
                .boxed(),
        }
    }

    /// The configured outputs, not yet installed
    pub fn build_layers(&self) -> Result<(Vec<BoxedLayer>, LogGuard), LoggingError> {
        let mut layers = Vec::new();
        let mut guard = LogGuard::default();

        if self.config.console.enabled {
            let filter = self.filter(self.config.console.level.as_deref())?;
            layers.push(self.console().with_filter(filter).boxed());
        }

        if let Some(file) = &self.config.file {
            let filter = self.filter(file.level.as_deref())?;
            let (writer, worker) = open_files(file)?;
            guard.file = Some(worker);
            layers.push(self.json(writer).with_filter(filter).boxed());
        }

        Ok((layers, guard))
    }

    /// Install as the global subscriber
    pub fn init(self) -> Result<LogGuard, LoggingError> {
        let (layers, guard) = self.build_layers()?;
        Registry::default()
            .with(layers)
            .try_init()
            .map_err(|_| LoggingError::AlreadyInitialized)?;
        Ok(guard)
    }
}

fn open_files(file: &FileOutput) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    std::fs::create_dir_all(&file.directory).map_err(|source| LoggingError::LogDir {
        path: file.directory.display().to_string(),
        source,
    })?;

    let rotation = match file.rotation {
        Rotation::Hourly => rolling::Rotation::HOURLY,
        Rotation::Daily => rolling::Rotation::DAILY,
        Rotation::Never => rolling::Rotation::NEVER,
    };
    let mut appender = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(&file.prefix)
        .filename_suffix("log");
    if let Some(keep) = file.keep {
        appender = appender.max_log_files(keep);
    }
    let appender = appender
        .build(&file.directory)
        .map_err(|e| LoggingError::Appender(e.to_string()))?;

    Ok(tracing_appender::non_blocking(appender))
}

/// Quiet logging for tests; later calls do nothing
pub fn init_testing() {
    let _ = FolioSubscriberBuilder::new()
        .with_config(LogConfig::testing())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let builder = FolioSubscriberBuilder::new()
            .with_level("trace")
            .with_console_format(LogFormat::Compact)
            .without_console();
        assert_eq!(builder.config().level, "trace");
        assert_eq!(builder.config().console.format, LogFormat::Compact);
        assert!(!builder.config().console.enabled);
    }

    #[test]
    fn test_console_and_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let builder = FolioSubscriberBuilder::new().with_files(FileOutput {
            rotation: Rotation::Never,
            ..FileOutput::new(dir.path().join("logs"))
        });

        let (layers, guard) = builder.build_layers().unwrap();
        assert_eq!(layers.len(), 2);
        assert!(guard.writes_files());
        assert!(dir.path().join("logs").is_dir());
    }

    #[test]
    fn test_every_console_format_builds() {
        for format in [LogFormat::Json, LogFormat::Pretty, LogFormat::Compact] {
            let (layers, guard) = FolioSubscriberBuilder::new()
                .with_console_format(format)
                .build_layers()
                .unwrap();
            assert_eq!(layers.len(), 1);
            assert!(!guard.writes_files());
        }
    }

    #[test]
    fn test_no_outputs() {
        let (layers, guard) = FolioSubscriberBuilder::new()
            .without_console()
            .build_layers()
            .unwrap();
        assert!(layers.is_empty());
        assert!(!guard.writes_files());
    }

    #[test]
    fn test_second_init_fails() {
        init_testing();
        let second = FolioSubscriberBuilder::new()
            .with_config(LogConfig::testing())
            .init();
        assert!(matches!(second, Err(LoggingError::AlreadyInitialized)));
    }
}
