//! Request path resolution and root containment.
//!
//! # Responsibilities
//! - Percent-decode and lexically clean the URL path
//! - Join the cleaned segments onto the canonical root
//! - Refuse paths whose real location (after symlinks) leaves the root

use std::io;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::error::{FileError, ACCESS_FORBIDDEN};

/// Maps URL paths onto the filesystem subtree being shared.
#[derive(Debug, Clone)]
pub struct PathResolver {
    /// Canonical (absolute, symlink-free) root directory.
    root: PathBuf,
}

impl PathResolver {
    /// Canonicalize `root` once; it must exist.
    pub fn new(root: &Path) -> io::Result<Self> {
        Ok(Self {
            root: root.canonicalize()?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lexical resolution: the result always starts with the root.
    pub fn resolve(&self, uri_path: &str) -> PathBuf {
        let mut resolved = self.root.clone();
        for segment in clean_segments(uri_path) {
            resolved.push(segment);
        }
        resolved
    }

    /// Resolve and verify that the nearest existing ancestor of the result
    /// really lives under the root.
    pub async fn resolve_checked(&self, uri_path: &str) -> Result<PathBuf, FileError> {
        let resolved = self.resolve(uri_path);
        self.ensure_contained(&resolved).await?;
        Ok(resolved)
    }

    /// Fail with Forbidden unless `path`, or its nearest existing ancestor,
    /// canonicalizes to a location under the root.
    pub(crate) async fn ensure_contained(&self, path: &Path) -> Result<(), FileError> {
        let mut probe = path;
        loop {
            match tokio::fs::canonicalize(probe).await {
                Ok(real) if real.starts_with(&self.root) => return Ok(()),
                Ok(real) => {
                    tracing::warn!(path = ?path, real = ?real, "Path escapes root");
                    return Err(FileError::forbidden(path, ACCESS_FORBIDDEN));
                }
                Err(_) => {
                    // A link we cannot follow may point anywhere.
                    let is_link = tokio::fs::symlink_metadata(probe)
                        .await
                        .map(|meta| meta.file_type().is_symlink())
                        .unwrap_or(false);
                    if is_link {
                        return Err(FileError::forbidden(path, ACCESS_FORBIDDEN));
                    }
                }
            }

            match probe.parent() {
                Some(parent) if parent.starts_with(&self.root) => probe = parent,
                _ => return Err(FileError::forbidden(path, ACCESS_FORBIDDEN)),
            }
        }
    }
}

/// Decode and clean a URL path into plain segments.
///
/// Empty and `.` segments vanish, `..` drops the previous segment and is
/// ignored at the top, so the output never climbs above its starting point.
pub fn clean_segments(uri_path: &str) -> Vec<String> {
    let decoded = percent_decode_str(uri_path).decode_utf8_lossy();
    let mut segments: Vec<String> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name => segments.push(name.to_string()),
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleaning_drops_dots_and_empties() {
        assert_eq!(clean_segments("/a//./b/"), vec!["a", "b"]);
        assert_eq!(clean_segments("/a/../b"), vec!["b"]);
        assert!(clean_segments("/").is_empty());
    }

    #[test]
    fn parent_segments_never_climb_above_root() {
        assert_eq!(clean_segments("/../../etc/passwd"), vec!["etc", "passwd"]);
        assert_eq!(clean_segments("/%2e%2e/%2E%2E/secret"), vec!["secret"]);
        assert_eq!(clean_segments("/a/..%2f..%2f../b"), vec!["b"]);
    }

    #[test]
    fn percent_encoding_is_decoded() {
        assert_eq!(clean_segments("/my%20file.txt"), vec!["my file.txt"]);
    }

    #[test]
    fn resolved_paths_stay_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = PathResolver::new(dir.path()).unwrap();

        for uri in ["/", "/..", "/../../x", "/a/../../b", "/%2e%2e/c", "//d/./e"] {
            let resolved = resolver.resolve(uri);
            assert!(
                resolved.starts_with(resolver.root()),
                "{uri} resolved to {resolved:?}"
            );
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlink_out_of_root_is_forbidden() {
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.txt"), b"secret").unwrap();
        let root = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path(), root.path().join("escape")).unwrap();

        let resolver = PathResolver::new(root.path()).unwrap();
        let err = resolver
            .resolve_checked("/escape/secret.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, FileError::Forbidden { .. }));

        let err = resolver.resolve_checked("/escape/new.txt").await.unwrap_err();
        assert!(matches!(err, FileError::Forbidden { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlink_inside_root_is_allowed() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("real")).unwrap();
        std::os::unix::fs::symlink(root.path().join("real"), root.path().join("alias")).unwrap();

        let resolver = PathResolver::new(root.path()).unwrap();
        let resolved = resolver.resolve_checked("/alias/missing.txt").await.unwrap();
        assert!(resolved.ends_with("alias/missing.txt"));
    }

    #[tokio::test]
    async fn missing_paths_are_contained() {
        let root = tempfile::tempdir().unwrap();
        let resolver = PathResolver::new(root.path()).unwrap();
        assert!(resolver.resolve_checked("/a/b/c.txt").await.is_ok());
    }
}
