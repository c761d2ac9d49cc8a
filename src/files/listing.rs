use std::time::UNIX_EPOCH;

use log::warn;
use serde::Serialize;
use tokio::fs;

use crate::files::error::FsError;
use crate::files::resolver::ResolvedPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    File,
}

/// One row of a directory listing.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub kind: EntryKind,
    /// Byte size; absent for directories.
    pub size: Option<u64>,
    pub size_human: Option<String>,
    /// Last-modified time as unix seconds, when the platform reports one.
    pub modified: Option<u64>,
}

impl DirectoryEntry {
    pub(crate) fn from_metadata(name: String, metadata: &std::fs::Metadata) -> Self {
        let kind = if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        let size = (kind == EntryKind::File).then(|| metadata.len());
        let modified = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs());

        DirectoryEntry {
            name,
            kind,
            size,
            size_human: size.map(human_size),
            modified,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Lists a resolved directory with directories first, then files, each
/// group case-insensitively ordered by name.
pub async fn list(resolved: &ResolvedPath) -> Result<Vec<DirectoryEntry>, FsError> {
    if !resolved.is_dir() {
        return Err(FsError::NotADirectory);
    }

    let mut read_dir = fs::read_dir(resolved.absolute())
        .await
        .map_err(FsError::from_read_io)?;

    let mut entries = Vec::new();
    while let Some(entry) = read_dir.next_entry().await.map_err(FsError::from_read_io)? {
        let name = entry.file_name().to_string_lossy().into_owned();
        // Follow symlinks so a link to a directory sorts with directories.
        match fs::metadata(entry.path()).await {
            Ok(metadata) => entries.push(DirectoryEntry::from_metadata(name, &metadata)),
            Err(e) => {
                warn!("failed to stat {:?}: {}", entry.path(), e);
            }
        }
    }

    entries.sort_by(|a, b| {
        b.is_dir()
            .cmp(&a.is_dir())
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });

    Ok(entries)
}

/// Decimal size rendering in the style of `humanize.naturalsize`.
fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["kB", "MB", "GB", "TB", "PB"];

    if bytes < 1000 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
