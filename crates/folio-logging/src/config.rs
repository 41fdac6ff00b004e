//! Logging configuration.
//!
//! Embedded as the `[logging]` table of the server config, so every field
//! has a default and partial tables are fine.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where and how Folio writes its logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level used by outputs without their own; `RUST_LOG` wins over it
    pub level: String,
    /// Extra filter directives, e.g. `"hyper=warn"`
    pub directives: Vec<String>,
    pub console: ConsoleOutput,
    /// Rolling file output; off when absent
    pub file: Option<FileOutput>,
    /// Shape of JSON lines, for whichever outputs use them
    pub json: JsonFields,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directives: vec!["hyper=warn".to_string(), "reqwest=warn".to_string()],
            console: ConsoleOutput::default(),
            file: None,
            json: JsonFields::default(),
        }
    }
}

impl LogConfig {
    /// Pretty, coloured, debug-level console output
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            console: ConsoleOutput {
                format: LogFormat::Pretty,
                ansi: true,
                ..ConsoleOutput::default()
            },
            ..Self::default()
        }
    }

    /// JSON lines on the console plus daily files under `log_dir`
    pub fn production(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(FileOutput::new(log_dir)),
            ..Self::default()
        }
    }

    /// Warnings only, compact and uncoloured
    pub fn testing() -> Self {
        Self {
            level: "warn".to_string(),
            console: ConsoleOutput {
                format: LogFormat::Compact,
                ..ConsoleOutput::default()
            },
            ..Self::default()
        }
    }

    /// Filter string for an output with an optional override level
    pub fn filter_for(&self, level: Option<&str>) -> String {
        std::iter::once(level.unwrap_or(&self.level))
            .chain(self.directives.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Line format of an output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Multi-line human-readable
    Pretty,
    /// Single-line human-readable
    Compact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleOutput {
    pub enabled: bool,
    pub format: LogFormat,
    /// Colour codes; ignored for JSON
    pub ansi: bool,
    pub level: Option<String>,
}

impl Default for ConsoleOutput {
    fn default() -> Self {
        Self {
            enabled: true,
            format: LogFormat::Json,
            ansi: false,
            level: None,
        }
    }
}

/// Rolling JSON-lines files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutput {
    pub directory: PathBuf,
    /// File names are `<prefix>.<date>.log`
    pub prefix: String,
    pub rotation: Rotation,
    /// Old files to keep; all when absent
    pub keep: Option<usize>,
    pub level: Option<String>,
}

impl FileOutput {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }
}

impl Default for FileOutput {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./logs"),
            prefix: "folio".to_string(),
            rotation: Rotation::Daily,
            keep: Some(14),
            level: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

/// Which fields JSON lines carry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonFields {
    /// Put event fields at the top level instead of under `fields`
    pub flatten: bool,
    /// Include the active span list
    pub spans: bool,
    /// Include file and line
    pub location: bool,
}

impl Default for JsonFields {
    fn default() -> Self {
        Self {
            flatten: true,
            spans: true,
            location: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.console.enabled);
        assert_eq!(config.console.format, LogFormat::Json);
        assert!(config.file.is_none());
    }

    #[test]
    fn test_presets() {
        assert_eq!(LogConfig::development().console.format, LogFormat::Pretty);
        assert_eq!(LogConfig::testing().level, "warn");

        let file = LogConfig::production("/var/log/folio").file.unwrap();
        assert_eq!(file.directory, PathBuf::from("/var/log/folio"));
        assert_eq!(file.rotation, Rotation::Daily);
    }

    #[test]
    fn test_filter_string() {
        let config = LogConfig {
            directives: vec!["hyper=warn".to_string()],
            ..LogConfig::default()
        };
        assert_eq!(config.filter_for(None), "info,hyper=warn");
        assert_eq!(config.filter_for(Some("trace")), "trace,hyper=warn");
    }

    #[test]
    fn test_partial_toml() {
        let config: LogConfig = toml::from_str(
            r#"
            level = "debug"

            [console]
            format = "compact"

            [file]
            directory = "/tmp/folio-logs"
            rotation = "hourly"
            "#,
        )
        .unwrap();

        assert_eq!(config.level, "debug");
        assert_eq!(config.console.format, LogFormat::Compact);
        assert!(config.console.enabled);
        let file = config.file.unwrap();
        assert_eq!(file.rotation, Rotation::Hourly);
        assert_eq!(file.prefix, "folio");
        assert_eq!(config.directives, LogConfig::default().directives);
    }
}
