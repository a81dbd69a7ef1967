//! Locating workspace descriptors on disk.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{PackError, Result};
use crate::workspace_file::WorkspaceFile;

const DESCRIPTOR_EXTENSION: &str = "apw";

/// Lists `.apw` files in `dir`, descending into subdirectories when
/// `recursive` is set.
///
/// Returns paths sorted ascending. Subdirectories that cannot be read are
/// skipped with a warning; only a failure on `dir` itself is an error.
pub fn find_workspaces(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PackError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        let entries = match std::fs::read_dir(&current) {
            Ok(entries) => entries,
            Err(e) if current == dir => return Err(PackError::io(dir, e)),
            Err(e) => {
                warn!(path = %current.display(), error = %e, "skipping unreadable directory");
                continue;
            }
        };

        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    warn!(path = %current.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if path.is_dir() {
                if recursive {
                    pending.push(path);
                }
            } else if is_descriptor(&path) {
                debug!(path = %path.display(), "found descriptor");
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}

/// Loads every descriptor [`find_workspaces`] reports.
///
/// Descriptors that fail to load are skipped with a warning.
pub fn load_workspaces(dir: &Path, recursive: bool) -> Result<Vec<WorkspaceFile>> {
    let paths = find_workspaces(dir, recursive)?;
    let mut loaded = Vec::with_capacity(paths.len());
    for path in paths {
        match WorkspaceFile::load(&path) {
            Ok(file) => loaded.push(file),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable descriptor"),
        }
    }
    Ok(loaded)
}

fn is_descriptor(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(DESCRIPTOR_EXTENSION))
}
