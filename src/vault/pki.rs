//! Vault PKI certificate issuance.
//!
//! One `POST /v1/<VaultPath>` per request spec. The backend always returns PEM;
//! any other encoding is produced locally by [`crate::output`].

use chrono::DateTime;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::transport::VaultTransport;
use super::types::{null_as_default, SecretString};
use crate::config::RequestSpec;
use crate::errors::{Result, VaultCertError};

/// `X-Vault-Token`
pub const VAULT_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-vault-token");

/// Payload for the PKI issue endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueRequest<'a> {
    pub common_name: &'a str,
    pub format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<&'a str>,
    /// Comma-joined, order preserved. Names containing commas are not escaped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_names: Option<String>,
}

impl<'a> IssueRequest<'a> {
    pub fn from_spec(spec: &'a RequestSpec) -> Self {
        Self {
            common_name: &spec.common_name,
            format: "pem",
            ttl: Some(spec.ttl.as_str()).filter(|ttl| !ttl.is_empty()),
            alt_names: (!spec.alt_names.is_empty()).then(|| spec.alt_names.join(",")),
        }
    }
}

#[derive(Deserialize)]
struct IssueResponse {
    data: CertificateBundle,
}

/// Certificate material issued for one request.
///
/// Fields missing from the response, or sent as `null`, are left empty; the
/// encoder decides whether that is acceptable for the requested format.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CertificateBundle {
    #[serde(default, deserialize_with = "null_as_default")]
    pub certificate: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub private_key: SecretString,
    #[serde(default, deserialize_with = "null_as_default")]
    pub private_key_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub issuing_ca: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ca_chain: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub serial_number: String,
    /// Expiry as seconds since the Unix epoch
    #[serde(default, deserialize_with = "null_as_default")]
    pub expiration: i64,
}

pub fn issue_url(vault_address: &str, vault_path: &str) -> String {
    format!("{}/v1/{}", vault_address, vault_path)
}

/// Request a certificate for `spec` using an already acquired token.
pub async fn issue(
    transport: &VaultTransport,
    vault_address: &str,
    spec: &RequestSpec,
    token: &SecretString,
) -> Result<CertificateBundle> {
    let url = issue_url(vault_address, &spec.vault_path);
    info!(
        url = %url,
        common_name = %spec.common_name,
        vault_path = %spec.vault_path,
        "Starting new Vault PKI request: {}", url
    );

    let payload = IssueRequest::from_spec(spec);
    debug!(payload = ?payload, "Vault PKI request payload");

    let mut token_value = HeaderValue::from_str(token.expose_secret()).map_err(|_| {
        VaultCertError::protocol("Vault token contains characters not allowed in a header")
    })?;
    token_value.set_sensitive(true);
    let mut headers = HeaderMap::new();
    headers.insert(VAULT_TOKEN_HEADER, token_value);

    let body = transport.exchange(&url, &payload, headers).await?;

    let response: IssueResponse = serde_json::from_slice(&body).map_err(|e| {
        VaultCertError::protocol_with_source(
            "Failed to unmarshal the HTTP response body into a certificate response",
            e,
        )
    })?;
    let bundle = response.data;
    debug!(bundle = ?bundle, "Certificate response after unmarshalling");

    match DateTime::from_timestamp(bundle.expiration, 0) {
        Some(expires_at) => info!(
            common_name = %spec.common_name,
            vault_path = %spec.vault_path,
            serial_number = %bundle.serial_number,
            expires_at = %expires_at,
            ca_chain_len = bundle.ca_chain.len(),
            "Issued certificate"
        ),
        None => warn!(
            common_name = %spec.common_name,
            expiration = bundle.expiration,
            "Issued certificate has an invalid expiration timestamp"
        ),
    }

    Ok(bundle)
}
