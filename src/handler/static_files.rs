//! Static file serving
//!
//! Resolves `/files/<name>` requests against the configured root directory
//! and loads the whole file as raw bytes.

use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Joins `name` onto `root` if it names something inside the root.
///
/// Only plain path segments are accepted, so `..`, absolute paths, and an
/// empty name never resolve.
pub fn resolve(root: &Path, name: &str) -> Option<PathBuf> {
    let relative = Path::new(name);
    let mut components = relative.components().peekable();
    components.peek()?;

    if !components.all(|c| matches!(c, Component::Normal(_))) {
        warn!(file = name, "Rejected file name outside the static root");
        return None;
    }

    Some(root.join(relative))
}

/// Reads the file at `path`, which must live under `root` once symlinks are
/// resolved.
///
/// Returns `None` if the file is missing, unreadable, a directory, or a link
/// pointing out of the root.
pub async fn load(root: &Path, path: &Path) -> Option<Vec<u8>> {
    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            warn!(root = %root.display(), error = %e, "Static root is not accessible");
            return None;
        }
    };

    // Missing files are the common 404 case
    let path_canonical = fs::canonicalize(path).await.ok()?;
    if !path_canonical.starts_with(&root_canonical) {
        warn!(
            path = %path.display(),
            resolved = %path_canonical.display(),
            "Path traversal attempt blocked"
        );
        return None;
    }

    match fs::read(&path_canonical).await {
        Ok(content) => Some(content),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Failed to read file");
            None
        }
    }
}
