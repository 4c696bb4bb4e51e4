//! Error types for querylens.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for querylens operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryLensError {
    /// A required input field was empty after trimming.
    #[error("{0}")]
    Validation(String),

    /// A submission was attempted while another request was outstanding.
    #[error("A request is already in progress")]
    Busy,

    /// The query service answered with a non-success status.
    #[error("{message}")]
    Service {
        /// HTTP status code returned by the service.
        status: u16,
        /// Human-readable message, taken from the service `detail` when present.
        message: String,
        /// The generated query the service reported as failing, if any.
        failed_query: Option<String>,
    },

    /// The request never completed or the response body could not be decoded.
    #[error("{0}")]
    Transport(String),

    /// A rendering collaborator (markdown, chart) rejected its input.
    #[error("Render error: {0}")]
    Render(String),

    /// Configuration errors (invalid config file, bad endpoint URL, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (terminal setup, unexpected states, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QueryLensError {
    /// Creates a validation error with the given message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a service error for the given status and message.
    pub fn service(status: u16, msg: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: msg.into(),
            failed_query: None,
        }
    }

    /// Attaches the failing query to a service error; other variants are unchanged.
    pub fn with_failed_query(self, query: Option<String>) -> Self {
        match self {
            Self::Service {
                status, message, ..
            } => Self::Service {
                status,
                message,
                failed_query: query,
            },
            other => other,
        }
    }

    /// Creates a transport error with the given message.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Creates a render error with the given message.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true for failures of the request itself (service or transport).
    ///
    /// These share one recovery path and end up as a single error section.
    pub fn is_request_failure(&self) -> bool {
        matches!(self, Self::Service { .. } | Self::Transport(_))
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Validation Error",
            Self::Busy => "Busy",
            Self::Service { .. } => "Service Error",
            Self::Transport(_) => "Transport Error",
            Self::Render(_) => "Render Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using QueryLensError.
pub type Result<T> = std::result::Result<T, QueryLensError>;
