//! # Vault Client
//!
//! Talks to HashiCorp Vault: a Kubernetes-auth login followed by one PKI
//! issue call per certificate request.
//!
//! # Architecture
//!
//! - [`transport`]: single JSON POST with a fixed timeout, non-200 is an error
//! - [`auth`]: service account JWT → short-lived Vault token
//! - [`pki`]: request spec + token → [`CertificateBundle`]
//! - [`PkiClient`]: the seam the pipeline drives, implemented by [`VaultClient`]

pub mod auth;
pub mod pki;
pub mod transport;
pub mod types;

pub use pki::{CertificateBundle, IssueRequest};
pub use transport::{VaultTransport, DEFAULT_TIMEOUT};
pub use types::SecretString;

use async_trait::async_trait;

use crate::config::{AppConfig, RequestSpec};
use crate::errors::Result;

/// Certificate issuance as seen by the pipeline driver.
#[async_trait]
pub trait PkiClient: Send + Sync {
    /// Authenticate and return an access token for subsequent issue calls.
    async fn login(&self) -> Result<SecretString>;

    /// Issue one certificate using a token obtained from [`PkiClient::login`].
    async fn issue(&self, request: &RequestSpec, token: &SecretString)
        -> Result<CertificateBundle>;
}

/// Vault-backed [`PkiClient`].
pub struct VaultClient {
    transport: VaultTransport,
    vault_address: String,
    cluster_name: String,
    role_name: String,
    service_account_token: SecretString,
}

impl std::fmt::Debug for VaultClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultClient")
            .field("vault_address", &self.vault_address)
            .field("cluster_name", &self.cluster_name)
            .field("role_name", &self.role_name)
            .field("timeout", &self.transport.timeout())
            .field("service_account_token", &self.service_account_token)
            .finish()
    }
}

impl VaultClient {
    /// Create a client with the default 5 second timeout.
    pub fn new(config: &AppConfig, service_account_token: SecretString) -> Result<Self> {
        Ok(Self::with_transport(
            config,
            service_account_token,
            VaultTransport::new(DEFAULT_TIMEOUT)?,
        ))
    }

    pub fn with_transport(
        config: &AppConfig,
        service_account_token: SecretString,
        transport: VaultTransport,
    ) -> Self {
        Self {
            transport,
            vault_address: config.vault_address.clone(),
            cluster_name: config.kubernetes_cluster_name.clone(),
            role_name: config.kubernetes_auth_role_name.clone(),
            service_account_token,
        }
    }

    pub fn vault_address(&self) -> &str {
        &self.vault_address
    }
}

#[async_trait]
impl PkiClient for VaultClient {
    async fn login(&self) -> Result<SecretString> {
        auth::login(
            &self.transport,
            &self.vault_address,
            &self.cluster_name,
            &self.role_name,
            &self.service_account_token,
        )
        .await
    }

    async fn issue(
        &self,
        request: &RequestSpec,
        token: &SecretString,
    ) -> Result<CertificateBundle> {
        pki::issue(&self.transport, &self.vault_address, request, token).await
    }
}
