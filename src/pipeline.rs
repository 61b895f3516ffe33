//! # Certificate Pipeline
//!
//! Drives a run: one login, then each request in file order through
//! issue → encode → write. The first failure aborts the run; files written for
//! earlier requests stay on disk.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::RequestSpec;
use crate::errors::Result;
use crate::output::{encode, write_artifact};
use crate::vault::PkiClient;

/// What a successful run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub requests_processed: usize,
    pub files_written: Vec<PathBuf>,
}

/// Process every request with a single access token.
pub async fn run<C>(
    client: &C,
    requests: &[RequestSpec],
    keystore_password: &str,
) -> Result<RunSummary>
where
    C: PkiClient + ?Sized,
{
    let mut summary = RunSummary::default();

    if requests.is_empty() {
        warn!("No certificates requested - exiting normally.");
        return Ok(summary);
    }

    let token = client.login().await?;

    for (index, request) in requests.iter().enumerate() {
        info!(
            index,
            common_name = %request.common_name,
            vault_path = %request.vault_path,
            output_format = %request.output_options.format,
            "Processing certificate request"
        );

        let bundle = client.issue(request, &token).await?;
        let options = &request.output_options;

        if options.has_kubernetes_secret() {
            warn!(
                common_name = %request.common_name,
                secret_name = %options.kubernetes_secret_resource_name,
                "Kubernetes secret storage is not yet implemented"
            );
        }

        if options.has_destination_folder() {
            let artifact = encode(request, &bundle, keystore_password)?;
            let written = write_artifact(request, &artifact).await?;
            summary.files_written.extend(written);
        }

        summary.requests_processed += 1;
    }

    info!(
        requests_processed = summary.requests_processed,
        files_written = summary.files_written.len(),
        "Certificate requests complete"
    );

    Ok(summary)
}
