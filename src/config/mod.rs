//! # Configuration Management
//!
//! Environment-driven process settings plus the user-supplied certificate
//! request file.

pub mod request;
pub mod settings;

pub use request::{load_request_specs, parse_request_specs, OutputFormat, OutputOptions, RequestSpec};
pub use settings::{
    trim_trailing_slash, AppConfig, ObservabilityConfig, DEFAULT_KEYSTORE_PASSWORD,
    DEFAULT_SERVICE_ACCOUNT_TOKEN_PATH,
};
