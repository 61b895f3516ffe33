//! # Error Types
//!
//! Every failure in the certificate pipeline is fatal for the run. Errors are
//! propagated with `?` up to the binary, which logs once and exits non-zero.

use validator::ValidationErrors;

/// Custom result type for certificate pipeline operations
pub type Result<T> = std::result::Result<T, VaultCertError>;

/// Main error type for the certificate pipeline
#[derive(thiserror::Error, Debug)]
pub enum VaultCertError {
    /// Missing or invalid settings, unreadable input files
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Request specification failed validation
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// The request never produced a response (connection refused, TLS failure, ...)
    #[error("Transport error calling {url}: {message}")]
    Transport { url: String, message: String },

    /// The request did not finish inside the client timeout
    #[error("Request to {url} timed out after {duration_ms}ms")]
    Timeout { url: String, duration_ms: u64 },

    /// Vault answered with anything other than 200 OK
    #[error("Status code was not 200 for {url} (status: {status})")]
    Status { url: String, status: u16 },

    /// Response body did not match the expected JSON shape
    #[error("Protocol error: {context}")]
    Protocol {
        context: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// PEM/DER decoding, key parsing or keystore assembly failed
    #[error("Encoding error: {message}")]
    Encoding {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The request asked for an output format this tool cannot produce
    #[error("Unknown output format '{format}' for common name '{common_name}' (vault path: {vault_path})")]
    UnknownFormat {
        format: String,
        common_name: String,
        vault_path: String,
    },

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },
}

impl VaultCertError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a transport error
    pub fn transport<U: Into<String>, S: Into<String>>(url: U, message: S) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a protocol error without an underlying parse error
    pub fn protocol<S: Into<String>>(context: S) -> Self {
        Self::Protocol {
            context: context.into(),
            source: None,
        }
    }

    /// Create a protocol error from a failed JSON parse
    pub fn protocol_with_source<S: Into<String>>(context: S, source: serde_json::Error) -> Self {
        Self::Protocol {
            context: context.into(),
            source: Some(source),
        }
    }

    /// Create an encoding error
    pub fn encoding<S: Into<String>>(message: S) -> Self {
        Self::Encoding {
            message: message.into(),
            source: None,
        }
    }

    /// Create an encoding error with source
    pub fn encoding_with_source<S: Into<String>>(message: S, source: anyhow::Error) -> Self {
        Self::Encoding {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create an I/O error with context
    pub fn io<S: Into<String>>(context: S, source: std::io::Error) -> Self {
        Self::Io {
            source,
            context: context.into(),
        }
    }

    /// Short category name, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::Validation { .. } => "validation",
            Self::Transport { .. } => "transport",
            Self::Timeout { .. } => "timeout",
            Self::Status { .. } => "status",
            Self::Protocol { .. } => "protocol",
            Self::Encoding { .. } => "encoding",
            Self::UnknownFormat { .. } => "unknown_format",
            Self::Io { .. } => "io",
        }
    }
}

impl From<ValidationErrors> for VaultCertError {
    fn from(errors: ValidationErrors) -> Self {
        let message = errors.to_string();
        match errors.field_errors().keys().next() {
            Some(field) => Self::validation_field(message, field.to_string()),
            None => Self::Validation {
                message,
                field: None,
            },
        }
    }
}
