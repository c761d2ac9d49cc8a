use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use log::{info, warn};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::files::error::FsError;
use crate::files::listing::DirectoryEntry;
use crate::files::resolver::ResolvedPath;

/// Receives a byte stream into `dest_dir/filename` with an atomic commit.
///
/// Bytes land in a temp file created in the destination directory, so
/// the final rename never crosses a filesystem boundary. The temp file
/// is unlinked on every failure path, including the caller's task being
/// dropped mid-transfer; the destination name either keeps its previous
/// content or appears fully written, never in between. An existing file
/// of the same name is replaced (last writer wins).
pub async fn receive<S>(
    dest_dir: &ResolvedPath,
    filename: &str,
    mut source: S,
    max_size: Option<u64>,
) -> Result<DirectoryEntry, FsError>
where
    S: Stream<Item = Result<Bytes, FsError>> + Unpin,
{
    if !dest_dir.is_dir() {
        return Err(FsError::DestinationNotDirectory);
    }
    validate_filename(filename)?;

    let temp = tempfile::Builder::new()
        .prefix(".upload-")
        .suffix(".part")
        .tempfile_in(dest_dir.absolute())
        .map_err(FsError::from_upload_io)?;
    let mut file = fs::File::from_std(temp.reopen().map_err(FsError::from_upload_io)?);

    let mut received: u64 = 0;
    while let Some(chunk) = source.next().await {
        let chunk = chunk?;
        if let Some(limit) = max_size {
            // Fail fast instead of writing an over-limit temp file out.
            if received + chunk.len() as u64 > limit {
                warn!("upload of {:?} exceeds limit of {} bytes", filename, limit);
                return Err(FsError::UploadTooLarge { limit });
            }
        }
        file.write_all(&chunk)
            .await
            .map_err(FsError::from_upload_io)?;
        received += chunk.len() as u64;
    }

    file.flush().await.map_err(FsError::from_upload_io)?;
    file.sync_all().await.map_err(FsError::from_upload_io)?;
    drop(file);

    let dest_path = dest_dir.absolute().join(filename);
    temp.persist(&dest_path)
        .map_err(|e| FsError::from_upload_io(e.error))?;
    info!("committed upload {:?} ({} bytes)", dest_path, received);

    let metadata = fs::metadata(&dest_path)
        .await
        .map_err(FsError::from_read_io)?;
    Ok(DirectoryEntry::from_metadata(filename.to_string(), &metadata))
}

/// Uploads address a directory plus a bare name; anything that could
/// change the directory is rejected here even though the resolver would
/// also catch it.
fn validate_filename(filename: &str) -> Result<(), FsError> {
    let bad = filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains('\0');
    if bad {
        return Err(FsError::InvalidFilename);
    }
    Ok(())
}
