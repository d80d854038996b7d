use crate::transport::TransportError;
use std::fmt;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "tools[2].name", "timeout_secs")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "tools_loader", "config_file")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that stop a run before a request is sent.
///
/// Everything that can go wrong after the request leaves the process is
/// reported as a [`QueryFailure`] instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid input: {message}{}", format_context(.context))]
    Input {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a new input error with structured context
    pub fn input_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Input {
            message: msg.into(),
            context,
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Input { context, .. } | Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }
}

/// Which stage of the round trip failed once the request was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The external HTTP client could not start, timed out, or exited non-zero.
    Transport,
    /// The API answered with an error payload (or without any choices).
    Api,
    /// The response was not JSON or did not have the expected shape.
    MalformedResponse,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::Transport => "transport",
            FailureKind::Api => "api",
            FailureKind::MalformedResponse => "malformed_response",
        };
        f.write_str(s)
    }
}

/// A failed round trip, tagged by stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} failure: {detail}")]
pub struct QueryFailure {
    pub kind: FailureKind,
    pub detail: String,
}

impl QueryFailure {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::Transport, detail)
    }

    pub fn api(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::Api, detail)
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::MalformedResponse, detail)
    }

    /// The human-readable result string for this failure.
    ///
    /// Transport failures collapse to a generic message; the detail is only
    /// shown in the console notice.
    pub fn display_text(&self) -> String {
        match self.kind {
            FailureKind::Transport => "API request failed".to_string(),
            FailureKind::Api | FailureKind::MalformedResponse => format!("Error: {}", self.detail),
        }
    }
}
