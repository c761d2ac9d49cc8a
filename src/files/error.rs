use std::io;

use thiserror::Error;

/// Errors produced by the file-access core.
///
/// Each variant is distinguishable so the web layer can map it to a
/// status code without inspecting message strings.
#[derive(Debug, Error)]
pub enum FsError {
    /// The client path resolved outside the configured root.
    #[error("path escapes the served root")]
    PathEscape,

    #[error("no such file or directory")]
    NotFound,

    #[error("not a directory")]
    NotADirectory,

    #[error("not a regular file")]
    NotAFile,

    /// Range header did not parse. Recovered internally by serving the
    /// full content; never reaches the web layer.
    #[error("malformed range expression")]
    RangeMalformed,

    /// Range start lies at or beyond the end of the file.
    #[error("range not satisfiable for file of {file_size} bytes")]
    RangeNotSatisfiable { file_size: u64 },

    #[error("invalid upload filename")]
    InvalidFilename,

    #[error("upload destination is not a directory")]
    DestinationNotDirectory,

    #[error("upload exceeds the configured size limit of {limit} bytes")]
    UploadTooLarge { limit: u64 },

    #[error("no space left on device")]
    DiskFull,

    #[error("upload failed: {0}")]
    UploadIo(#[source] io::Error),

    #[error("permission denied")]
    PermissionDenied,

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl FsError {
    /// Classifies an I/O error from a read-side operation (resolve, list,
    /// stream) into the taxonomy.
    pub(crate) fn from_read_io(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FsError::NotFound,
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied,
            _ => FsError::Io(err),
        }
    }

    /// Classifies an I/O error raised while receiving an upload.
    pub(crate) fn from_upload_io(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::StorageFull => FsError::DiskFull,
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied,
            _ => FsError::UploadIo(err),
        }
    }
}
