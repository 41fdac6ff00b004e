//! Error types for folio-core

use thiserror::Error;

/// Errors produced while decoding content or connection parameters
#[derive(Debug, Error)]
pub enum ContentError {
    /// The value is not a JSON object at the top level
    #[error("Malformed content: expected an object, found {found}")]
    NotAnObject {
        /// JSON type that was found instead
        found: &'static str,
    },

    /// One or more sections could not be decoded
    #[error("Invalid section `{section}`: {reason}")]
    InvalidSection {
        /// Section key
        section: String,
        /// Decoder message
        reason: String,
    },

    /// Raw text was not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Remote connection parameters were rejected
    #[error("Invalid remote configuration: {reason}")]
    InvalidRemoteConfig {
        /// Why the parameters were rejected
        reason: String,
    },
}

impl ContentError {
    /// Create an InvalidRemoteConfig error
    pub fn invalid_remote_config(reason: impl Into<String>) -> Self {
        Self::InvalidRemoteConfig {
            reason: reason.into(),
        }
    }

    /// Create an InvalidSection error
    pub fn invalid_section(section: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSection {
            section: section.into(),
            reason: reason.into(),
        }
    }
}

/// Name of a JSON value's type, used in error messages
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_an_object_message() {
        let err = ContentError::NotAnObject { found: "array" };
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn test_invalid_remote_config_message() {
        let err = ContentError::invalid_remote_config("databaseURL is missing");
        assert!(matches!(err, ContentError::InvalidRemoteConfig { .. }));
        assert!(err.to_string().contains("databaseURL"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{apiKey: 1}").unwrap_err();
        let err: ContentError = json_err.into();
        assert!(matches!(err, ContentError::Json(_)));
    }
}
