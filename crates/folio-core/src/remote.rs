//! Remote connection parameters.
//!
//! Operators paste these as JSON in the admin surface. The text is parsed
//! as strict JSON and checked; nothing in it is ever evaluated.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ContentError, json_type_name};

/// Default node path holding the document
pub const DEFAULT_NODE: &str = "site_content";

/// Connection parameters for a hosted realtime database.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub auth_domain: String,
    /// Base URL of the database, e.g. `https://example.firebasedatabase.app`
    #[serde(rename = "databaseURL")]
    pub database_url: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub storage_bucket: String,
    #[serde(default)]
    pub messaging_sender_id: String,
    #[serde(default)]
    pub app_id: String,
    /// Node path under the database root
    #[serde(default = "default_node")]
    pub node: String,
    /// Optional access token appended to every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

fn default_node() -> String {
    DEFAULT_NODE.to_string()
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("database_url", &self.database_url)
            .field("node", &self.node)
            .field("project_id", &self.project_id)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl RemoteConfig {
    /// Parameters for a database URL with everything else defaulted.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            api_key: String::new(),
            auth_domain: String::new(),
            database_url: database_url.into(),
            project_id: String::new(),
            storage_bucket: String::new(),
            messaging_sender_id: String::new(),
            app_id: String::new(),
            node: default_node(),
            auth_token: None,
        }
    }

    /// Set the node path
    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = node.into();
        self
    }

    /// Set the access token
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Parse operator-supplied text.
    ///
    /// The text must be a JSON object. Unquoted keys, trailing commas and
    /// JavaScript expressions are rejected with the parser's line/column.
    pub fn parse(text: &str) -> Result<Self, ContentError> {
        let value: Value = serde_json::from_str(text.trim()).map_err(|e| {
            ContentError::invalid_remote_config(format!("not valid JSON ({e})"))
        })?;
        if !value.is_object() {
            return Err(ContentError::invalid_remote_config(format!(
                "expected a JSON object, found {}",
                json_type_name(&value)
            )));
        }
        let config: RemoteConfig = serde_json::from_value(value)
            .map_err(|e| ContentError::invalid_remote_config(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Check the database URL and node path.
    pub fn check(&self) -> Result<(), ContentError> {
        let url = self.database_url.trim();
        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .ok_or_else(|| {
                ContentError::invalid_remote_config("databaseURL must start with http:// or https://")
            })?;
        let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
        if host.is_empty() || host.contains(char::is_whitespace) {
            return Err(ContentError::invalid_remote_config(
                "databaseURL has no host",
            ));
        }

        let node = self.node.trim_matches('/');
        if node.is_empty() {
            return Err(ContentError::invalid_remote_config("node must not be empty"));
        }
        if node.contains(['.', '#', '$', '[', ']']) {
            return Err(ContentError::invalid_remote_config(format!(
                "node '{}' contains a forbidden character",
                self.node
            )));
        }
        Ok(())
    }

    /// `databaseURL/node`, without a trailing slash
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.database_url.trim().trim_end_matches('/'),
            self.node.trim_matches('/')
        )
    }
}

/// Where the active connection parameters came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionSource {
    /// Compiled into the deployment's configuration
    BuiltIn,
    /// Supplied by an operator in this session
    Operator,
    /// Supplied by an operator in an earlier session and persisted locally
    Persisted,
}

impl ConnectionSource {
    /// Whether connecting with this source should persist the parameters
    pub fn persists(self) -> bool {
        matches!(self, ConnectionSource::Operator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASTED: &str = r#"{
        "apiKey": "AIza-test",
        "authDomain": "site.firebaseapp.com",
        "databaseURL": "https://site-default-rtdb.example.app",
        "projectId": "site",
        "storageBucket": "site.appspot.com",
        "messagingSenderId": "123",
        "appId": "1:123:web:abc"
    }"#;

    #[test]
    fn test_parse_pasted_config() {
        let config = RemoteConfig::parse(PASTED).unwrap();
        assert_eq!(config.project_id, "site");
        assert_eq!(config.node, DEFAULT_NODE);
        assert_eq!(
            config.endpoint(),
            "https://site-default-rtdb.example.app/site_content"
        );
    }

    #[test]
    fn test_unquoted_keys_are_rejected() {
        let err = RemoteConfig::parse(r#"{ databaseURL: "https://x.app" }"#).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("not valid JSON"), "{message}");
        assert!(message.contains("line 1"), "{message}");
    }

    #[test]
    fn test_expressions_are_rejected() {
        let err = RemoteConfig::parse(r#"{"databaseURL": (() => "https://x.app")()}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_non_object_rejected() {
        let err = RemoteConfig::parse(r#""https://x.app""#).unwrap_err();
        assert!(err.to_string().contains("found string"));
    }

    #[test]
    fn test_missing_or_bad_url() {
        assert!(RemoteConfig::parse(r#"{"apiKey": "k"}"#).is_err());
        assert!(RemoteConfig::parse(r#"{"databaseURL": "ftp://x.app"}"#).is_err());
        assert!(RemoteConfig::parse(r#"{"databaseURL": "https://"}"#).is_err());
    }

    #[test]
    fn test_bad_node() {
        let err = RemoteConfig::new("https://x.app").with_node("a.b").check();
        assert!(err.is_err());
        let err = RemoteConfig::new("https://x.app").with_node("/").check();
        assert!(err.is_err());
        assert!(RemoteConfig::new("https://x.app").with_node("sites/main").check().is_ok());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = RemoteConfig::new("https://x.app").with_auth_token("secret-token");
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn test_only_operator_source_persists() {
        assert!(ConnectionSource::Operator.persists());
        assert!(!ConnectionSource::BuiltIn.persists());
        assert!(!ConnectionSource::Persisted.persists());
    }
}
