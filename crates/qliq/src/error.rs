//! Error types for tree processing, credential storage and the API client

use thiserror::Error;

/// Errors raised while normalizing or rendering a referral tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// A required field is absent from a raw node
    #[error("Missing field `{field}` at {path}")]
    MissingField {
        /// Canonical name of the missing field
        field: String,
        /// Location of the offending node
        path: String,
    },

    /// A field is present but has the wrong JSON type
    #[error("Invalid field `{field}` at {path}: expected {expected}")]
    InvalidField {
        /// Server-side field name
        field: String,
        /// Location of the offending node
        path: String,
        /// Description of the accepted type
        expected: &'static str,
    },

    /// The tree nests deeper than the configured ceiling
    #[error("Tree too deep: {depth} levels exceeds maximum of {max}")]
    TreeTooDeep {
        /// Depth that was reached
        depth: usize,
        /// Configured maximum
        max: usize,
    },

    /// A node repeats the id of one of its own ancestors
    #[error("Cycle detected: node `{id}` reappears below itself ({path})")]
    CycleDetected {
        /// The repeated id
        id: String,
        /// Ancestor chain from the root down to the repeat, joined by ` > `
        path: String,
    },
}

/// Errors raised by a [`CredentialStore`](crate::session::CredentialStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("Credential store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not valid JSON
    #[error("Credential store is corrupt: {0}")]
    Json(#[from] serde_json::Error),

    /// No platform configuration directory could be located
    #[error("Cannot find a configuration directory for the credential store")]
    NoConfigDir,
}

/// Errors raised while loading a [`ClientConfig`](crate::config::ClientConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configured base URL does not parse
    #[error("Invalid base URL `{url}`: {source}")]
    BaseUrl {
        /// The rejected value
        url: String,
        /// Parser error
        #[source]
        source: url::ParseError,
    },

    /// `max_tree_depth` is above [`MAX_DEPTH_LIMIT`](crate::context::MAX_DEPTH_LIMIT)
    #[error("max_tree_depth {value} exceeds the limit of {limit}")]
    TreeDepth {
        /// Configured value
        value: usize,
        /// Highest accepted value
        limit: usize,
    },

    /// No platform configuration directory could be located
    #[error("Cannot find a configuration directory")]
    NoConfigDir,
}

/// Errors surfaced by the [`ApiClient`](crate::client::ApiClient).
///
/// Every remote operation returns one of these instead of swallowing the
/// failure; presentation concerns (alerts, redirects) belong to the caller.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Login was rejected
    #[error("Authentication failed: {message}")]
    Auth {
        /// Server-provided reason
        message: String,
    },

    /// Registration input was rejected
    #[error("Validation failed: {message}")]
    Validation {
        /// Server-provided or local reason
        message: String,
    },

    /// Registration collided with an existing account
    #[error("Conflict: {message}")]
    Conflict {
        /// Server-provided reason
        message: String,
    },

    /// The session is missing or no longer accepted
    #[error("Unauthorized ({status}): {message}")]
    Unauthorized {
        /// HTTP status code (401 or 403)
        status: u16,
        /// Server-provided reason
        message: String,
    },

    /// The requested resource does not exist
    #[error("Not found: {path}")]
    NotFound {
        /// Request path
        path: String,
    },

    /// Any other non-success response
    #[error("Server error {status}: {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Server-provided reason
        message: String,
    },

    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The product catalog could not be retrieved
    #[error("Catalog fetch failed: {0}")]
    CatalogFetch(#[source] Box<ApiError>),

    /// The response body did not match the expected shape
    #[error("Cannot decode response from {path}: {source}")]
    Decode {
        /// Request path
        path: String,
        /// Decoder error
        #[source]
        source: serde_json::Error,
    },

    /// The endpoint URL could not be built
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// The credential store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The referral tree payload was malformed
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl ApiError {
    /// HTTP status carried by this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { status, .. } | ApiError::Server { status, .. } => {
                Some(*status)
            }
            ApiError::NotFound { .. } => Some(404),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            ApiError::CatalogFetch(inner) => inner.status(),
            _ => None,
        }
    }

    /// Whether the caller should send the user back to the login screen.
    pub fn requires_login(&self) -> bool {
        match self {
            ApiError::Auth { .. } | ApiError::Unauthorized { .. } => true,
            ApiError::CatalogFetch(inner) => inner.requires_login(),
            _ => false,
        }
    }
}

/// Result type alias for API client operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_fetch_exposes_inner_status() {
        let err = ApiError::CatalogFetch(Box::new(ApiError::Server {
            status: 503,
            message: "down".into(),
        }));
        assert_eq!(err.status(), Some(503));
        assert!(!err.requires_login());
    }

    #[test]
    fn test_unauthorized_requires_login() {
        let err = ApiError::Unauthorized {
            status: 401,
            message: "expired".into(),
        };
        assert!(err.requires_login());
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_tree_error_messages() {
        let err = TreeError::MissingField {
            field: "id".into(),
            path: "root.downlines[0]".into(),
        };
        assert_eq!(err.to_string(), "Missing field `id` at root.downlines[0]");

        let err = TreeError::TreeTooDeep { depth: 9, max: 8 };
        assert_eq!(
            err.to_string(),
            "Tree too deep: 9 levels exceeds maximum of 8"
        );
    }
}
