//! # vault-cert-init
//!
//! Init-container style tool that obtains TLS certificates from HashiCorp
//! Vault's PKI engine and writes them to disk before the main workload starts.
//!
//! ## Architecture
//!
//! ```text
//! request file ─┐
//!               ├→ Pipeline ─→ Vault login (once) ─→ PKI issue (per request)
//! environment ──┘                                        ↓
//!                                            Encoder (PEM | PKCS#12) ─→ files
//! ```
//!
//! ## Core Components
//!
//! - **Configuration**: environment settings plus the JSON request file
//! - **Vault Client**: Kubernetes-auth login and PKI issue over a single HTTP transport
//! - **Encoder**: PEM file set or password-protected PKCS#12 keystore
//! - **Pipeline**: sequential, fail-fast driver over all requests
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use vault_cert_init::{config::load_request_specs, pipeline, AppConfig, Result, SecretString, VaultClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::from_env()?;
//!     let jwt = SecretString::new(config.read_service_account_token()?);
//!     let requests = load_request_specs(&config.request_spec_path)?;
//!     let client = VaultClient::new(&config, jwt)?;
//!     pipeline::run(&client, &requests, &config.keystore_password).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod errors;
pub mod observability;
pub mod output;
pub mod pipeline;
pub mod vault;

// Re-export commonly used types and traits
pub use config::{AppConfig, ObservabilityConfig, RequestSpec};
pub use errors::{Result, VaultCertError};
pub use observability::init_logging;
pub use pipeline::RunSummary;
pub use vault::{PkiClient, SecretString, VaultClient};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
