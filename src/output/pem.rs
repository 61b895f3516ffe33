//! PEM output: the four fields of the bundle written verbatim.

use zeroize::Zeroizing;

use super::OutputFile;
use crate::vault::CertificateBundle;

pub const CERTIFICATE_SUFFIX: &str = "certificate.pem";
pub const KEY_SUFFIX: &str = "key.pem";
pub const ISSUING_CA_SUFFIX: &str = "issuing_ca.pem";
pub const CHAIN_SUFFIX: &str = "chain.pem";

/// Split a bundle into its four PEM files.
///
/// Empty fields still produce a (zero-length) file; the chain entries are
/// joined with a single newline.
pub fn encode_pem(bundle: &CertificateBundle) -> [OutputFile; 4] {
    [
        OutputFile::new(CERTIFICATE_SUFFIX, bundle.certificate.as_bytes().to_vec()),
        OutputFile::new(KEY_SUFFIX, bundle.private_key.expose_secret().as_bytes().to_vec()),
        OutputFile::new(ISSUING_CA_SUFFIX, bundle.issuing_ca.as_bytes().to_vec()),
        OutputFile::new(CHAIN_SUFFIX, Zeroizing::new(bundle.ca_chain.join("\n").into_bytes())),
    ]
}
