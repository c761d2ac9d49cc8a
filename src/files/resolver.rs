use std::fs::Metadata;
use std::path::{Path, PathBuf};

use log::warn;
use tokio::fs;

use crate::files::error::FsError;

/// Resolves client-supplied relative paths against the served root.
///
/// Every request path passes through here before any other component
/// touches the filesystem; `DirectoryLister`, `StreamSession` and the
/// upload path only ever operate on a [`ResolvedPath`].
pub struct PathResolver {
    root_dir: PathBuf,
}

/// A canonical absolute path proven to live under the root, together
/// with the metadata captured by the classification stat.
///
/// Only [`PathResolver::resolve`] constructs these.
#[derive(Debug)]
pub struct ResolvedPath {
    absolute: PathBuf,
    metadata: Metadata,
}

impl ResolvedPath {
    pub fn absolute(&self) -> &Path {
        &self.absolute
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn is_dir(&self) -> bool {
        self.metadata.is_dir()
    }

    pub fn is_file(&self) -> bool {
        self.metadata.is_file()
    }

    /// Base name of the resolved path; the root itself has none.
    pub fn file_name(&self) -> Option<&str> {
        self.absolute.file_name().and_then(|n| n.to_str())
    }
}

impl PathResolver {
    /// `root_dir` must already be canonical; `main` canonicalizes it at
    /// startup before the resolver is built.
    pub fn new(root_dir: PathBuf) -> Self {
        Self { root_dir }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Resolves `path` to a canonical location inside the root.
    ///
    /// A leading `/` is treated as the served root, not the host root.
    /// Canonicalization resolves `.`/`..` and symlinks before the
    /// containment check, so a link pointing outside the root fails the
    /// same way a `..` escape does.
    pub async fn resolve(&self, path: &str) -> Result<ResolvedPath, FsError> {
        let relative = path.trim_start_matches('/');
        let joined = self.root_dir.join(relative);

        let canonical = match fs::canonicalize(&joined).await {
            Ok(canonical) => canonical,
            Err(e) => return Err(FsError::from_read_io(e)),
        };

        // Component-wise prefix check: "/root-evil" does not start with
        // the components of "/root".
        if !canonical.starts_with(&self.root_dir) {
            warn!("attempt to access outside the root directory: {:?}", joined);
            return Err(FsError::PathEscape);
        }

        let metadata = fs::metadata(&canonical)
            .await
            .map_err(FsError::from_read_io)?;

        // Sockets, fifos and device nodes are never served.
        if !metadata.is_file() && !metadata.is_dir() {
            warn!("refusing special file: {:?}", canonical);
            return Err(FsError::NotFound);
        }

        Ok(ResolvedPath {
            absolute: canonical,
            metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn resolver_with_tree() -> (tempfile::TempDir, PathResolver) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std::fs::create_dir(root.join("sub")).unwrap();
        std::fs::write(root.join("sub/file.txt"), b"hello").unwrap();
        (dir, PathResolver::new(root))
    }

    #[tokio::test]
    async fn resolves_nested_file() {
        let (_dir, resolver) = resolver_with_tree().await;
        let resolved = resolver.resolve("sub/file.txt").await.unwrap();
        assert!(resolved.is_file());
        assert!(!resolved.is_dir());
        assert_eq!(resolved.file_name(), Some("file.txt"));
        assert!(resolved.absolute().starts_with(resolver.root_dir()));
    }

    #[tokio::test]
    async fn leading_slash_means_served_root() {
        let (_dir, resolver) = resolver_with_tree().await;
        let resolved = resolver.resolve("/sub").await.unwrap();
        assert!(resolved.is_dir());
    }

    #[tokio::test]
    async fn empty_path_is_the_root() {
        let (_dir, resolver) = resolver_with_tree().await;
        let resolved = resolver.resolve("").await.unwrap();
        assert_eq!(resolved.absolute(), resolver.root_dir());
    }

    #[tokio::test]
    async fn dotdot_escape_is_rejected() {
        let (_dir, resolver) = resolver_with_tree().await;
        let err = resolver.resolve("..").await.unwrap_err();
        assert!(matches!(err, FsError::PathEscape));

        let err = resolver.resolve("sub/../..").await.unwrap_err();
        assert!(matches!(err, FsError::PathEscape));
    }

    #[tokio::test]
    async fn sibling_prefix_does_not_match() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().canonicalize().unwrap();
        let root = base.join("root");
        std::fs::create_dir(&root).unwrap();
        std::fs::create_dir(base.join("root-evil")).unwrap();
        std::fs::write(base.join("root-evil/secret"), b"x").unwrap();

        let resolver = PathResolver::new(root);
        let err = resolver.resolve("../root-evil/secret").await.unwrap_err();
        assert!(matches!(err, FsError::PathEscape));
    }

    #[tokio::test]
    async fn absolute_override_cannot_reach_host_root() {
        let (_dir, resolver) = resolver_with_tree().await;
        // "/etc/passwd" is interpreted relative to the served root and
        // does not exist there.
        let err = resolver.resolve("/etc/passwd").await.unwrap_err();
        assert!(matches!(err, FsError::NotFound));
    }

    #[tokio::test]
    async fn missing_path_is_not_found() {
        let (_dir, resolver) = resolver_with_tree().await;
        let err = resolver.resolve("sub/absent.txt").await.unwrap_err();
        assert!(matches!(err, FsError::NotFound));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlink_out_of_root_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().canonicalize().unwrap();
        let root = base.join("root");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(base.join("outside.txt"), b"secret").unwrap();
        std::os::unix::fs::symlink(base.join("outside.txt"), root.join("link")).unwrap();

        let resolver = PathResolver::new(root);
        let err = resolver.resolve("link").await.unwrap_err();
        assert!(matches!(err, FsError::PathEscape));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlink_inside_root_is_served() {
        let (_dir, resolver) = resolver_with_tree().await;
        let root = resolver.root_dir().to_path_buf();
        std::os::unix::fs::symlink(root.join("sub/file.txt"), root.join("alias")).unwrap();

        let resolved = resolver.resolve("alias").await.unwrap();
        assert!(resolved.is_file());
        assert_eq!(resolved.absolute(), root.join("sub/file.txt"));
    }
}
