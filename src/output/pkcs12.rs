//! PKCS#12 keystore output.
//!
//! The keystore holds a single private-key entry whose chain is the leaf
//! certificate followed by the CA chain in the order Vault returned it. Only
//! RSA keys are accepted.

use anyhow::anyhow;
use p12_keystore::{Certificate, KeyStore, KeyStoreEntry, PrivateKeyChain};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::{DecodePrivateKey, EncodePrivateKey};
use rsa::RsaPrivateKey;
use rustls::pki_types::pem::PemObject;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use sha2::{Digest, Sha256};
use tracing::debug;
use x509_parser::prelude::{FromDer, X509Certificate};
use zeroize::Zeroizing;

use crate::errors::{Result, VaultCertError};

pub const KEYSTORE_SUFFIX: &str = "keystore.p12";

/// Build a password-protected PKCS#12 archive.
///
/// Every input is decoded before anything is assembled; the first malformed
/// PEM block or DER structure aborts with an encoding error.
pub fn create_pkcs12(
    alias: &str,
    key_pem: &str,
    cert_pem: &str,
    ca_cert_pems: &[String],
    password: &str,
) -> Result<Zeroizing<Vec<u8>>> {
    let key = decode_rsa_private_key(key_pem)?;
    let key_pkcs8 = key.to_pkcs8_der().map_err(|e| {
        VaultCertError::encoding_with_source(
            "Failed to re-encode RSA private key as PKCS#8",
            anyhow!(e),
        )
    })?;

    let leaf = decode_certificate(cert_pem, "certificate")?;
    let local_key_id = Sha256::digest(leaf.as_der());

    let mut chain = Vec::with_capacity(ca_cert_pems.len() + 1);
    chain.push(leaf);
    for ca_cert_pem in ca_cert_pems {
        chain.push(decode_certificate(ca_cert_pem, "CA certificate")?);
    }

    let mut keystore = KeyStore::new();
    keystore.add_entry(
        alias,
        KeyStoreEntry::PrivateKeyChain(PrivateKeyChain::new(
            key_pkcs8.as_bytes(),
            local_key_id,
            chain,
        )),
    );

    let bytes = keystore.writer(password).write().map_err(|e| {
        VaultCertError::encoding_with_source("Failed to create PKCS12 object", anyhow!(e))
    })?;

    Ok(Zeroizing::new(bytes))
}

/// Decode the first private key PEM block and parse it as RSA.
///
/// PKCS#1 (`RSA PRIVATE KEY`) is what Vault issues; a PKCS#8 block is accepted
/// when it wraps an RSA key. EC keys are rejected.
pub fn decode_rsa_private_key(key_pem: &str) -> Result<RsaPrivateKey> {
    let key_der = PrivateKeyDer::from_pem_slice(key_pem.as_bytes()).map_err(|e| {
        VaultCertError::encoding_with_source("Failed to decode private key PEM into DER", anyhow!(e))
    })?;

    let parse_error = |e: anyhow::Error| {
        VaultCertError::encoding_with_source(
            "Failed to parse DER-encoded private key whilst building RSA private key object",
            e,
        )
    };

    match &key_der {
        PrivateKeyDer::Pkcs1(der) => RsaPrivateKey::from_pkcs1_der(der.secret_pkcs1_der())
            .map_err(|e| parse_error(anyhow!(e))),
        PrivateKeyDer::Pkcs8(der) => RsaPrivateKey::from_pkcs8_der(der.secret_pkcs8_der())
            .map_err(|e| parse_error(anyhow!(e))),
        PrivateKeyDer::Sec1(_) => Err(VaultCertError::encoding(
            "Unsupported private key type: EC keys cannot be stored, only RSA is supported",
        )),
        _ => Err(VaultCertError::encoding("Unsupported private key encoding")),
    }
}

/// Decode the first certificate PEM block and check it parses as X.509.
pub fn decode_certificate(cert_pem: &str, what: &str) -> Result<Certificate> {
    let der = CertificateDer::from_pem_slice(cert_pem.as_bytes()).map_err(|e| {
        VaultCertError::encoding_with_source(
            format!("Failed to decode {} PEM into DER", what),
            anyhow!(e),
        )
    })?;

    let parse_error = |e: anyhow::Error| {
        VaultCertError::encoding_with_source(
            format!("Failed to parse DER-encoded {} whilst building X509 certificate object", what),
            e,
        )
    };

    let (_, parsed) = X509Certificate::from_der(der.as_ref()).map_err(|e| parse_error(anyhow!(e)))?;
    debug!(subject = %parsed.subject(), issuer = %parsed.issuer(), "Decoded {}", what);

    Certificate::from_der(der.as_ref()).map_err(|e| parse_error(anyhow!(e)))
}
