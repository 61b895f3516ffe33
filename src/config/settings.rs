//! # Settings
//!
//! Process configuration read once from the environment. The resulting
//! [`AppConfig`] is passed by reference to every component that needs it.

use std::path::PathBuf;

use tracing::debug;
use url::Url;

use crate::errors::{Result, VaultCertError};

pub const REQUEST_SPEC_PATH: &str = "REQUEST_SPEC_PATH";
pub const SERVICE_ACCOUNT_TOKEN_PATH: &str = "SERVICE_ACCOUNT_TOKEN_PATH";
pub const VAULT_ADDR: &str = "VAULT_ADDR";
pub const K8S_AUTH_ROLE_NAME: &str = "K8S_AUTH_ROLE_NAME";
pub const KUBERNETES_CLUSTER_NAME: &str = "KUBERNETES_CLUSTER_NAME";
pub const ENABLE_DEBUG: &str = "ENABLE_DEBUG";
pub const CONSOLE_FORMATTER: &str = "CONSOLE_FORMATTER";
pub const KEYSTORE_PASSWORD: &str = "KEYSTORE_PASSWORD";

/// Where Kubernetes mounts the pod's service account token.
pub const DEFAULT_SERVICE_ACCOUNT_TOKEN_PATH: &str =
    "/var/run/secrets/kubernetes.io/serviceaccount/token";

/// Conventional PKCS#12 password. Confidentiality of the keystore is left to
/// the filesystem or secret store holding it.
pub const DEFAULT_KEYSTORE_PASSWORD: &str = "changeit";

/// Formatter name selecting JSON log lines.
pub const LOGSTASH_FORMATTER: &str = "logstash";

/// Everything the pipeline needs to run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub request_spec_path: PathBuf,
    pub service_account_token_path: PathBuf,
    /// Vault address with any trailing slash removed
    pub vault_address: String,
    pub kubernetes_auth_role_name: String,
    pub kubernetes_cluster_name: String,
    pub keystore_password: String,
    pub observability: ObservabilityConfig,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    pub enable_debug: bool,
    pub console_formatter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            enable_debug: false,
            console_formatter: LOGSTASH_FORMATTER.to_string(),
        }
    }
}

impl ObservabilityConfig {
    /// Read logging settings from the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    /// Read logging settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let enable_debug = non_empty(&lookup, ENABLE_DEBUG).as_deref() == Some("true");
        let console_formatter = non_empty(&lookup, CONSOLE_FORMATTER)
            .unwrap_or_else(|| LOGSTASH_FORMATTER.to_string());

        Self {
            enable_debug,
            console_formatter,
        }
    }

    /// JSON output is used for the logstash formatter, human-readable text otherwise.
    pub fn json_logging(&self) -> bool {
        self.console_formatter == LOGSTASH_FORMATTER
    }

    pub fn log_level(&self) -> &'static str {
        if self.enable_debug {
            "debug"
        } else {
            "info"
        }
    }
}

impl AppConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    /// Build configuration through an arbitrary key lookup.
    ///
    /// Keys that are present but empty are treated as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let request_spec_path = PathBuf::from(required(&lookup, REQUEST_SPEC_PATH)?);
        let service_account_token_path = PathBuf::from(
            non_empty(&lookup, SERVICE_ACCOUNT_TOKEN_PATH)
                .unwrap_or_else(|| DEFAULT_SERVICE_ACCOUNT_TOKEN_PATH.to_string()),
        );

        let vault_address = trim_trailing_slash(&required(&lookup, VAULT_ADDR)?).to_string();
        Url::parse(&vault_address).map_err(|e| {
            VaultCertError::config_with_source(
                format!("{} is not a valid URL: '{}'", VAULT_ADDR, vault_address),
                Box::new(e),
            )
        })?;

        let kubernetes_auth_role_name = required(&lookup, K8S_AUTH_ROLE_NAME)?;
        let kubernetes_cluster_name = required(&lookup, KUBERNETES_CLUSTER_NAME)?;
        let keystore_password = non_empty(&lookup, KEYSTORE_PASSWORD)
            .unwrap_or_else(|| DEFAULT_KEYSTORE_PASSWORD.to_string());

        let config = Self {
            request_spec_path,
            service_account_token_path,
            vault_address,
            kubernetes_auth_role_name,
            kubernetes_cluster_name,
            keystore_password,
            observability: ObservabilityConfig::from_lookup(&lookup),
        };
        config.log_summary();

        Ok(config)
    }

    /// Read the service account token this pod authenticates with.
    pub fn read_service_account_token(&self) -> Result<String> {
        let token = std::fs::read_to_string(&self.service_account_token_path).map_err(|e| {
            VaultCertError::config_with_source(
                format!("Failed to read file: '{}'", self.service_account_token_path.display()),
                Box::new(e),
            )
        })?;

        Ok(token.trim().to_string())
    }

    fn log_summary(&self) {
        debug!(
            request_spec_path = %self.request_spec_path.display(),
            service_account_token_path = %self.service_account_token_path.display(),
            vault_address = %self.vault_address,
            kubernetes_auth_role_name = %self.kubernetes_auth_role_name,
            kubernetes_cluster_name = %self.kubernetes_cluster_name,
            debug_enabled = self.observability.enable_debug,
            "Using configuration"
        );
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.is_empty())
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, key)
        .ok_or_else(|| VaultCertError::config(format!("{} is a required environment variable", key)))
}

/// Strip a single trailing `/`.
pub fn trim_trailing_slash(value: &str) -> &str {
    value.strip_suffix('/').unwrap_or(value)
}
