//! Server configuration and command-line interface.
//!
//! Settings come from an optional TOML file; command-line flags override
//! the file.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use folio_cms::{AuthConfig, StoreConfig};
use folio_core::RemoteConfig;
use folio_logging::LogConfig;
use folio_storage::{ByteQuota, RedbLocalStoreConfig};
use serde::{Deserialize, Serialize};

/// File name of the content database inside `data_dir`
pub const DB_FILE: &str = "folio.redb";

/// Full server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP API listens on
    pub bind: SocketAddr,
    /// Directory holding the content database
    pub data_dir: PathBuf,
    /// Size limit for a single stored value, in bytes
    pub max_value_bytes: Option<usize>,
    pub store: StoreConfig,
    pub auth: AuthConfig,
    pub logging: LogConfig,
    /// Remote compiled into this deployment; connected on startup
    pub remote: Option<RemoteConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            data_dir: PathBuf::from("./data"),
            max_value_bytes: None,
            store: StoreConfig::default(),
            auth: AuthConfig::default(),
            logging: LogConfig::default(),
            remote: None,
        }
    }
}

impl ServerConfig {
    /// Parse a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Read a TOML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Store settings with the `[remote]` table as built-in remote
    pub fn store_config(&self) -> StoreConfig {
        match &self.remote {
            Some(remote) => self.store.clone().with_built_in_remote(remote.clone()),
            None => self.store.clone(),
        }
    }

    /// Settings for the local database
    pub fn local_store_config(&self) -> RedbLocalStoreConfig {
        let quota = self
            .max_value_bytes
            .map(ByteQuota::new)
            .unwrap_or_default();
        RedbLocalStoreConfig::new(self.data_dir.join(DB_FILE)).with_quota(quota)
    }
}

#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Content store and admin API for the Folio site")]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the content database
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the HTTP API (default)
    ///
    /// Password recovery codes are written to the console log under the
    /// `folio::recovery` target. Anyone who can read that log can reset the
    /// admin credentials; add `folio::recovery=off` to `logging.directives`
    /// if the log is shipped or shared.
    Serve {
        /// Listen address
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Print the current document as JSON
    Show,
    /// Restore the default document, locally and on the connected remote
    Reset {
        /// Confirm the reset; there is no undo
        #[arg(long)]
        yes: bool,
    },
    /// Check a remote connection parameter file without connecting
    CheckRemote {
        /// File holding the pasted JSON parameters
        file: PathBuf,
    },
}

impl Cli {
    /// Load the config file (if any) and apply flag overrides
    pub fn server_config(&self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(Command::Serve { bind: Some(bind) }) = &self.command {
            config.bind = *bind;
        }
        Ok(config)
    }

    /// The subcommand, defaulting to `serve`
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve { bind: None })
    }
}
