//! # Error Handling
//!
//! Defines the single error type that every layer of the pipeline returns.

pub mod types;

pub use types::{Result, VaultCertError};
