//! Candidate enumeration — parallel directory walking via `jwalk`.
//!
//! The walk produces the frozen list of candidate paths the orchestrator
//! submits to the pool. Only regular files qualify: directories are
//! descended into, symlinks are not followed, and special files are
//! skipped. A root that cannot be enumerated at all is fatal; individual
//! unreadable entries deeper in the tree are logged and skipped so one bad
//! subdirectory cannot abort the whole run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

/// Fatal enumeration failures. Per-entry errors are not represented here;
/// they are skipped with a warning during the walk.
#[derive(Debug, Error)]
pub enum TraversalError {
    #[error("cannot access root directory {}: {source}", .path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("root path is not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),
}

/// Collect every regular file under `root`.
pub fn enumerate(root: &Path) -> Result<Vec<PathBuf>, TraversalError> {
    let meta = fs::metadata(root).map_err(|source| TraversalError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(TraversalError::RootNotDirectory(root.to_path_buf()));
    }

    let walker = jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(jwalk::Parallelism::RayonNewPool(num_cpus::get()));

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => {
                // file_type here is the symlink-free type: links to files
                // report as symlinks and are skipped.
                if entry.file_type().is_file() {
                    files.push(entry.path());
                }
            }
            Err(err) => {
                warn!("skipping unreadable entry: {err}");
            }
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn touch(path: &Path, content: &[u8]) {
        let mut f = File::create(path).unwrap();
        f.write_all(content).unwrap();
    }

    #[test]
    fn finds_files_at_every_depth() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        touch(&tmp.path().join("top"), b"1");
        touch(&nested.join("deep"), b"2");

        let mut files = enumerate(tmp.path()).unwrap();
        files.sort();
        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|p| p.ends_with("top")));
        assert!(files.iter().any(|p| p.ends_with("deep")));
    }

    #[test]
    fn empty_tree_yields_no_candidates() {
        let tmp = TempDir::new().unwrap();
        assert!(enumerate(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_root_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let gone = tmp.path().join("nope");
        assert!(matches!(
            enumerate(&gone),
            Err(TraversalError::RootUnreadable { .. })
        ));
    }

    #[test]
    fn file_root_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("just-a-file");
        touch(&file, b"x");
        assert!(matches!(
            enumerate(&file),
            Err(TraversalError::RootNotDirectory(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_candidates() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("real");
        touch(&target, b"payload");
        std::os::unix::fs::symlink(&target, tmp.path().join("link")).unwrap();

        let files = enumerate(tmp.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("real"));
    }
}
