//! Writes encoded artifacts into the destination folder.

use std::path::{Path, PathBuf};

use tokio::fs::{DirBuilder, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::info;

use super::EncodedArtifact;
use crate::config::RequestSpec;
use crate::errors::{Result, VaultCertError};

/// rwxr-xr-x
pub const DIRECTORY_MODE: u32 = 0o755;
/// rw-r--r--
pub const FILE_MODE: u32 = 0o644;

/// Create the destination folder if needed and write every file in `artifact`.
///
/// Existing files with the same name are truncated. Returns the paths written,
/// in artifact order.
pub async fn write_artifact(
    request: &RequestSpec,
    artifact: &EncodedArtifact,
) -> Result<Vec<PathBuf>> {
    let options = &request.output_options;
    let folder = Path::new(&options.destination_folder_path);

    create_folder(folder).await?;

    let mut written = Vec::with_capacity(artifact.files().len());
    for file in artifact.files() {
        let path = folder.join(file.file_name(&options.file_name_prefix));
        info!(
            common_name = %request.common_name,
            vault_path = %request.vault_path,
            output_format = %options.format,
            path = %path.display(),
            "Writing file: {}", path.display()
        );
        write_file(&path, file.contents()).await?;
        written.push(path);
    }

    Ok(written)
}

async fn create_folder(folder: &Path) -> Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(DIRECTORY_MODE);

    builder.create(folder).await.map_err(|e| {
        VaultCertError::io(format!("Failed to create directory {}", folder.display()), e)
    })
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(FILE_MODE);

    let context = || format!("Failed to write file {}", path.display());

    let mut file = options.open(path).await.map_err(|e| VaultCertError::io(context(), e))?;
    file.write_all(contents).await.map_err(|e| VaultCertError::io(context(), e))?;
    file.flush().await.map_err(|e| VaultCertError::io(context(), e))?;

    Ok(())
}
