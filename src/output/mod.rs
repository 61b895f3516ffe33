//! # Output Encoding
//!
//! Turns an issued [`CertificateBundle`] into the files requested by a
//! [`RequestSpec`]. Encoding is pure and finishes before [`writer`] touches the
//! filesystem, so a request that fails to encode leaves nothing behind.

pub mod pem;
pub mod pkcs12;
pub mod writer;

pub use writer::{write_artifact, DIRECTORY_MODE, FILE_MODE};

use zeroize::Zeroizing;

use crate::config::{OutputFormat, RequestSpec};
use crate::errors::{Result, VaultCertError};
use crate::vault::CertificateBundle;

/// A single file to write, named `<prefix>-<suffix>`.
#[derive(Clone)]
pub struct OutputFile {
    suffix: &'static str,
    contents: Zeroizing<Vec<u8>>,
}

impl OutputFile {
    pub fn new(suffix: &'static str, contents: impl Into<Zeroizing<Vec<u8>>>) -> Self {
        Self {
            suffix,
            contents: contents.into(),
        }
    }

    pub fn suffix(&self) -> &'static str {
        self.suffix
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    pub fn file_name(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.suffix)
    }
}

impl std::fmt::Debug for OutputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputFile")
            .field("suffix", &self.suffix)
            .field("len", &self.contents.len())
            .finish()
    }
}

/// Encoded form of one bundle.
#[derive(Debug, Clone)]
pub enum EncodedArtifact {
    /// certificate, key, issuing CA and chain
    Pem([OutputFile; 4]),
    /// a single password-protected keystore
    Pkcs12(OutputFile),
}

impl EncodedArtifact {
    pub fn files(&self) -> &[OutputFile] {
        match self {
            Self::Pem(files) => files,
            Self::Pkcs12(file) => std::slice::from_ref(file),
        }
    }
}

/// Encode `bundle` in the format `request` asks for.
pub fn encode(
    request: &RequestSpec,
    bundle: &CertificateBundle,
    keystore_password: &str,
) -> Result<EncodedArtifact> {
    match &request.output_options.format {
        OutputFormat::Pem => Ok(EncodedArtifact::Pem(pem::encode_pem(bundle))),
        OutputFormat::Pkcs12 => {
            let keystore = pkcs12::create_pkcs12(
                &request.common_name,
                bundle.private_key.expose_secret(),
                &bundle.certificate,
                &bundle.ca_chain,
                keystore_password,
            )?;
            Ok(EncodedArtifact::Pkcs12(OutputFile::new(pkcs12::KEYSTORE_SUFFIX, keystore)))
        }
        OutputFormat::Unknown(format) => Err(VaultCertError::UnknownFormat {
            format: format.clone(),
            common_name: request.common_name.clone(),
            vault_path: request.vault_path.clone(),
        }),
    }
}
