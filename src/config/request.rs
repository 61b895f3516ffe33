//! Certificate request specifications.
//!
//! The request file is a JSON array using the PascalCase keys operators already
//! write for this tool:
//!
//! ```json
//! [{
//!   "VaultPath": "pki/issue/my-role",
//!   "CommonName": "svc.example.com",
//!   "AltNames": ["a.example.com"],
//!   "TTL": "1h",
//!   "OutputOptions": {
//!     "Format": "PKCS12",
//!     "FileNamePrefix": "svc",
//!     "DestinationFolderPath": "/etc/tls"
//!   }
//! }]
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::errors::{Result, VaultCertError};

/// Specification for a single certificate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct RequestSpec {
    /// PKI mount and role, e.g. `pki/issue/my-role`
    #[validate(length(min = 1, message = "VaultPath cannot be empty"))]
    pub vault_path: String,

    #[validate(length(min = 1, message = "CommonName cannot be empty"))]
    pub common_name: String,

    #[serde(default)]
    pub alt_names: Vec<String>,

    /// Backend duration string such as "1h", "30m" or "60d"; empty means role default
    #[serde(default, rename = "TTL", alias = "Ttl")]
    pub ttl: String,

    #[validate(nested)]
    pub output_options: OutputOptions,
}

/// Format and location of the files produced for a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
#[validate(schema(function = "validate_destination"))]
pub struct OutputOptions {
    pub format: OutputFormat,

    #[serde(default)]
    pub file_name_prefix: String,

    /// Folder to write into when running as an init container
    #[serde(default)]
    pub destination_folder_path: String,

    /// Kubernetes secret to publish to when running as a job
    #[serde(default)]
    pub kubernetes_secret_resource_name: String,
}

impl OutputOptions {
    pub fn has_destination_folder(&self) -> bool {
        !self.destination_folder_path.is_empty()
    }

    pub fn has_kubernetes_secret(&self) -> bool {
        !self.kubernetes_secret_resource_name.is_empty()
    }
}

fn validate_destination(options: &OutputOptions) -> std::result::Result<(), ValidationError> {
    if options.has_destination_folder() || options.has_kubernetes_secret() {
        return Ok(());
    }

    let mut error = ValidationError::new("missing_destination");
    error.message = Some(
        "At least one of DestinationFolderPath and KubernetesSecretResourceName must be specified"
            .into(),
    );
    Err(error)
}

/// Supported certificate stores.
///
/// Unrecognised values are kept rather than rejected at parse time so the
/// failure can name the offending request when its output is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OutputFormat {
    /// PEM-encoded text files
    Pem,
    /// A single password-protected PKCS#12 keystore
    Pkcs12,
    /// Anything else, JKS included
    Unknown(String),
}

impl OutputFormat {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pem => "PEM",
            Self::Pkcs12 => "PKCS12",
            Self::Unknown(other) => other,
        }
    }
}

impl From<String> for OutputFormat {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PEM" => Self::Pem,
            "PKCS12" => Self::Pkcs12,
            _ => Self::Unknown(value),
        }
    }
}

impl From<OutputFormat> for String {
    fn from(format: OutputFormat) -> Self {
        format.as_str().to_string()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse and validate the request-spec JSON document.
pub fn parse_request_specs(json: &str) -> Result<Vec<RequestSpec>> {
    let specs: Vec<RequestSpec> = serde_json::from_str(json).map_err(|e| {
        VaultCertError::config_with_source(
            "Failed to unmarshal the user-provided certificate request spec file",
            Box::new(e),
        )
    })?;

    for spec in &specs {
        spec.validate()?;
    }

    Ok(specs)
}

/// Read, parse and validate the request-spec file.
pub fn load_request_specs(path: &Path) -> Result<Vec<RequestSpec>> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        VaultCertError::config_with_source(
            format!("Failed to read file: '{}'", path.display()),
            Box::new(e),
        )
    })?;

    parse_request_specs(&json)
}
