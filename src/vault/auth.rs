//! Kubernetes auth method login.
//!
//! Exchanges the pod's service account JWT for a short-lived Vault token via
//! `POST /v1/auth/kubernetes/<cluster>/login`.

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::transport::VaultTransport;
use super::types::{null_as_default, SecretString};
use crate::errors::{Result, VaultCertError};

/// Body of the login request.
#[derive(Serialize)]
struct LoginRequest<'a> {
    role: &'a str,
    jwt: &'a str,
}

/// Response sent back from a login request.
///
/// Every field tolerates `null`; only `auth.client_token` is required, and
/// that is checked after parsing.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub request_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lease_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub renewable: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lease_duration: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub auth: LoginAuth,
}

/// The short-lived token and its metadata.
#[derive(Debug, Default, Deserialize)]
pub struct LoginAuth {
    #[serde(default, deserialize_with = "null_as_default")]
    pub client_token: SecretString,
    #[serde(default, deserialize_with = "null_as_default")]
    pub accessor: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub policies: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub token_policies: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: LoginMetadata,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lease_duration: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub renewable: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entity_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub token_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub orphan: bool,
}

/// The Kubernetes service account that authorised the login.
#[derive(Debug, Default, Deserialize)]
pub struct LoginMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_account_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_account_namespace: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_account_secret_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_account_uid: String,
}

pub fn login_url(vault_address: &str, cluster_name: &str) -> String {
    format!("{}/v1/auth/kubernetes/{}/login", vault_address, cluster_name)
}

/// Log in once and return the client token.
pub async fn login(
    transport: &VaultTransport,
    vault_address: &str,
    cluster_name: &str,
    role_name: &str,
    service_account_token: &SecretString,
) -> Result<SecretString> {
    let url = login_url(vault_address, cluster_name);
    info!(url = %url, role = %role_name, "New Vault Login request: {}", url);

    let payload = LoginRequest {
        role: role_name,
        jwt: service_account_token.expose_secret(),
    };
    let body = transport.exchange(&url, &payload, HeaderMap::new()).await?;

    let response: LoginResponse = serde_json::from_slice(&body).map_err(|e| {
        VaultCertError::protocol_with_source("Failed to unmarshal vault login response", e)
    })?;
    debug!(response = ?response, "Login response after unmarshalling");

    if response.auth.client_token.is_empty() {
        return Err(VaultCertError::protocol("Vault login response did not contain a client token"));
    }

    info!(
        url = %url,
        lease_duration = response.auth.lease_duration,
        renewable = response.auth.renewable,
        policies = ?response.auth.policies,
        service_account = %response.auth.metadata.service_account_name,
        "Acquired Vault token"
    );

    Ok(response.auth.client_token)
}
