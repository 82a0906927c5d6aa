//! Typed error handling for the landing list manager
//!
//! Every failure the list manager can surface is one of a small set of
//! categories, so hosting pages can react to them specifically rather than
//! matching on strings.
//!
//! # Error Categories
//!
//! - [`FetchError`]: the record source failed (session expiry, HTTP, transport)
//! - [`StorageError`]: the key-value store holding view preferences failed
//! - [`ConfigError`]: console configuration could not be parsed or resolved
//! - [`ViewStateError`]: an invalid view preference was supplied
//!
//! A missing `results` key in a list payload is *not* an error, and neither
//! is a filter that matches nothing.
//!
//! # Example
//!
//! ```rust,ignore
//! match list.fetch().await {
//!     Ok(summary) => println!("{} records", summary.total),
//!     Err(ListError::Fetch(FetchError::SessionExpired { message })) => {
//!         notify_and_logout(&message);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// The main error type of the crate
#[derive(Debug)]
pub enum ListError {
    /// Record source failures
    Fetch(FetchError),

    /// Preference store failures
    Storage(StorageError),

    /// Configuration errors
    Config(ConfigError),

    /// Invalid view preferences
    ViewState(ViewStateError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListError::Fetch(e) => write!(f, "{}", e),
            ListError::Storage(e) => write!(f, "{}", e),
            ListError::Config(e) => write!(f, "{}", e),
            ListError::ViewState(e) => write!(f, "{}", e),
            ListError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ListError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListError::Fetch(e) => Some(e),
            ListError::Storage(e) => Some(e),
            ListError::Config(e) => Some(e),
            ListError::ViewState(e) => Some(e),
            ListError::Internal(_) => None,
        }
    }
}

/// Serializable form of an error for the hosting notification surface
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorNotice {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ListError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ListError::Fetch(e) => e.error_code(),
            ListError::Storage(_) => "STORAGE_ERROR",
            ListError::Config(_) => "CONFIG_ERROR",
            ListError::ViewState(_) => "VIEW_STATE_ERROR",
            ListError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether this error ends the user's session
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ListError::Fetch(FetchError::SessionExpired { .. }))
    }

    /// Convert to a notice for the hosting page
    pub fn to_notice(&self) -> ErrorNotice {
        ErrorNotice {
            code: self.error_code().to_string(),
            message: self.to_string(),
        }
    }
}

// =============================================================================
// Fetch Errors
// =============================================================================

/// Errors raised by a record source
///
/// Sources normalise every failure body to one of these variants, whatever
/// key (`error` or `message`) the endpoint used for its text.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Authorization expired (HTTP 403); the session must end
    SessionExpired {
        message: String,
    },

    /// Endpoint answered with a non-success status
    Http {
        status: u16,
        message: String,
    },

    /// Request never completed (connection, timeout)
    Transport {
        message: String,
    },

    /// Response body could not be decoded
    Decode {
        message: String,
    },
}

impl FetchError {
    /// Default text shown when a 403 body carries no message
    pub const SESSION_EXPIRED_DEFAULT: &'static str = "Your session has expired";

    /// Normalise an HTTP failure from its status and (possibly empty) body
    ///
    /// The text is read from `error`, then `message`; a 403 always maps to
    /// [`FetchError::SessionExpired`].
    pub fn from_status(status: u16, body: Option<&Value>) -> Self {
        let text = body.and_then(error_text);
        if status == 403 {
            FetchError::SessionExpired {
                message: text.unwrap_or_else(|| Self::SESSION_EXPIRED_DEFAULT.to_string()),
            }
        } else {
            FetchError::Http {
                status,
                message: text.unwrap_or_else(|| format!("request failed with status {}", status)),
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            FetchError::SessionExpired { .. } => "SESSION_EXPIRED",
            FetchError::Http { .. } => "HTTP_ERROR",
            FetchError::Transport { .. } => "TRANSPORT_ERROR",
            FetchError::Decode { .. } => "DECODE_ERROR",
        }
    }

    /// Whether a later attempt may succeed without user action
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::SessionExpired { .. } | FetchError::Decode { .. } => false,
            FetchError::Http { status, .. } => *status >= 500 || *status == 429,
            FetchError::Transport { .. } => true,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            FetchError::SessionExpired { message }
            | FetchError::Http { message, .. }
            | FetchError::Transport { message }
            | FetchError::Decode { message } => message,
        }
    }
}

fn error_text(body: &Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::SessionExpired { message } => {
                write!(f, "Session expired: {}", message)
            }
            FetchError::Http { status, message } => {
                write!(f, "HTTP {}: {}", status, message)
            }
            FetchError::Transport { message } => {
                write!(f, "Transport error: {}", message)
            }
            FetchError::Decode { message } => {
                write!(f, "Failed to decode list payload: {}", message)
            }
        }
    }
}

impl std::error::Error for FetchError {}

impl From<FetchError> for ListError {
    fn from(err: FetchError) -> Self {
        ListError::Fetch(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to preference storage backends
#[derive(Debug)]
pub enum StorageError {
    /// Filesystem error
    Io {
        path: String,
        message: String,
    },

    /// Backend-specific failure (serialization, transaction)
    Backend {
        backend: String,
        message: String,
    },

    /// A lock guarding an in-process store was poisoned
    LockPoisoned {
        message: String,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io { path, message } => {
                write!(f, "Storage IO error on '{}': {}", path, message)
            }
            StorageError::Backend { backend, message } => {
                write!(f, "{} storage error: {}", backend, message)
            }
            StorageError::LockPoisoned { message } => {
                write!(f, "Storage lock poisoned: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for ListError {
    fn from(err: StorageError) -> Self {
        ListError::Storage(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// No resource with the requested key
    UnknownResource {
        key: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::UnknownResource { key } => {
                write!(f, "No resource configured with key '{}'", key)
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for ListError {
    fn from(err: ConfigError) -> Self {
        ListError::Config(err)
    }
}

// =============================================================================
// View State Errors
// =============================================================================

/// Errors related to view preferences
#[derive(Debug, Clone, PartialEq)]
pub enum ViewStateError {
    /// View mode other than `table` or `grid`
    InvalidViewMode {
        value: String,
    },
}

impl fmt::Display for ViewStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewStateError::InvalidViewMode { value } => {
                write!(f, "Invalid view mode '{}': expected 'table' or 'grid'", value)
            }
        }
    }
}

impl std::error::Error for ViewStateError {}

impl From<ViewStateError> for ListError {
    fn from(err: ViewStateError) -> Self {
        ListError::ViewState(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_yaml::Error> for ListError {
    fn from(err: serde_yaml::Error) -> Self {
        ListError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<anyhow::Error> for ListError {
    fn from(err: anyhow::Error) -> Self {
        // Config loaders return anyhow; keep their typed errors as config errors
        let err = match err.downcast::<ConfigError>() {
            Ok(config) => return ListError::Config(config),
            Err(err) => err,
        };
        match err.downcast::<serde_yaml::Error>() {
            Ok(yaml) => yaml.into(),
            Err(err) => ListError::Internal(err.to_string()),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for list operations
pub type ListResult<T> = Result<T, ListError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_403_with_error_key() {
        let body = json!({"error": "Session timed out"});
        let err = FetchError::from_status(403, Some(&body));
        assert_eq!(
            err,
            FetchError::SessionExpired {
                message: "Session timed out".to_string()
            }
        );
    }

    #[test]
    fn test_403_with_message_key() {
        let body = json!({"message": "Please log in again"});
        let err = FetchError::from_status(403, Some(&body));
        assert_eq!(err.message(), "Please log in again");
        assert_eq!(err.error_code(), "SESSION_EXPIRED");
    }

    #[test]
    fn test_403_without_body_uses_default() {
        let err = FetchError::from_status(403, None);
        assert_eq!(err.message(), FetchError::SESSION_EXPIRED_DEFAULT);
    }

    #[test]
    fn test_other_status_is_http_error() {
        let err = FetchError::from_status(500, Some(&json!({})));
        assert!(matches!(err, FetchError::Http { status: 500, .. }));
        assert!(err.is_retryable());

        let err = FetchError::from_status(404, None);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_session_expired_is_not_retryable() {
        let err = FetchError::SessionExpired {
            message: "expired".to_string(),
        };
        assert!(!err.is_retryable());
        let list_err: ListError = err.into();
        assert!(list_err.is_session_expired());
    }

    #[test]
    fn test_notice() {
        let err: ListError = ViewStateError::InvalidViewMode {
            value: "carousel".to_string(),
        }
        .into();
        let notice = err.to_notice();
        assert_eq!(notice.code, "VIEW_STATE_ERROR");
        assert!(notice.message.contains("carousel"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::UnknownResource {
            key: "buckets".to_string(),
        };
        assert!(err.to_string().contains("buckets"));
    }
}
