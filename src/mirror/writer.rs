use crate::MirrorError;
use std::path::Path;

/// Writes a resource to its mirror path, creating parent directories first
///
/// # Arguments
///
/// * `path` - Destination file, usually from [`crate::mirror::local_path`]
/// * `bytes` - The (possibly rewritten) resource content
///
/// # Returns
///
/// * `Ok(())` - The file was written
/// * `Err(MirrorError::Filesystem)` - Directory creation or the write failed
pub async fn save(path: &Path, bytes: &[u8]) -> Result<(), MirrorError> {
    let fs_error = |source| MirrorError::Filesystem {
        path: path.to_path_buf(),
        source,
    };

    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir).await.map_err(fs_error)?;
    }

    tokio::fs::write(path, bytes).await.map_err(fs_error)?;
    tracing::info!("saved {} ({} bytes)", path.display(), bytes.len());

    Ok(())
}
