//! Error types and provider error classification.

use thiserror::Error;

/// Provider error code reported when a network was deleted or never existed.
pub const CODE_NETWORK_NOT_FOUND: &str = "InvalidNetworkID.NotFound";

/// Errors that can occur while converging provider resources.
#[derive(Debug, Error)]
pub enum CloudError {
    /// Resource absent, or observed in a state that does not count as found.
    #[error("not found: {0}")]
    NotFound(String),

    /// More than one resource matched an ownership filter. Always fatal;
    /// requires operator cleanup, never auto-resolved.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Raw provider API error carrying the provider's error code.
    #[error("provider error [{code}]: {message}")]
    Api { code: String, message: String },

    /// Transport-level failure wrapped with operation context.
    #[error("{context}: {message}")]
    Transport { context: String, message: String },

    /// Malformed persisted provider config/status payload.
    #[error("config decode: {0}")]
    ConfigDecode(String),
}

impl CloudError {
    /// Raw provider API error.
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        CloudError::Api {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Transport error with operation context.
    pub fn transport(context: impl Into<String>, message: impl Into<String>) -> Self {
        CloudError::Transport {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Provider error code, if this is a raw API error.
    pub fn code(&self) -> Option<&str> {
        match self {
            CloudError::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// True if this error means the resource is absent. Recognizes both the
    /// semantic variant and the provider's `*.NotFound` code family.
    pub fn is_not_found(&self) -> bool {
        match self {
            CloudError::NotFound(_) => true,
            CloudError::Api { code, .. } => {
                code == CODE_NETWORK_NOT_FOUND || code.ends_with(".NotFound")
            }
            _ => false,
        }
    }

    /// True if this error means an ambiguous or duplicate resource.
    pub fn is_conflict(&self) -> bool {
        match self {
            CloudError::Conflict(_) => true,
            CloudError::Api { code, .. } => {
                code.ends_with(".Conflict") || code.ends_with(".DuplicateName")
            }
            _ => false,
        }
    }

    /// Wrap a transport-class error with operation context.
    ///
    /// NotFound and Conflict classifications survive untouched so callers
    /// higher up can still branch on them.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        if self.is_not_found() || self.is_conflict() {
            return self;
        }
        match self {
            CloudError::ConfigDecode(_) => self,
            other => CloudError::Transport {
                context: context.into(),
                message: other.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for CloudError {
    fn from(e: serde_json::Error) -> Self {
        CloudError::ConfigDecode(e.to_string())
    }
}

/// Result type for convergence operations.
pub type Result<T> = std::result::Result<T, CloudError>;
