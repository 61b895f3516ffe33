//! # Observability Infrastructure
//!
//! Structured logging for the certificate pipeline.

pub mod logging;

pub use logging::{env_filter, init_logging};
