//! Collects the files a workspace references and checks they exist.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use apw_model::{FileType, Workspace};

use crate::paths::resolve;

/// Two file entries that resolved to the same absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
    pub path: PathBuf,
    /// Type of the entry that was replaced.
    pub previous: FileType,
    /// Type of the entry that is kept.
    pub kept: FileType,
}

/// Resolved absolute paths of every referenced file with their declared type.
///
/// Built once per workspace and shared by verification and archiving.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileSet {
    files: BTreeMap<PathBuf, FileType>,
    collisions: Vec<Collision>,
    missing: Vec<PathBuf>,
}

impl FileSet {
    /// Resolves every file entry against `origin` and checks each path on disk.
    ///
    /// When two entries resolve to the same path the later one wins.
    pub fn collect(workspace: &Workspace, origin: &Path) -> Self {
        let mut set = Self::default();
        for system in workspace.systems() {
            for file in &system.files {
                let path = resolve(origin, &file.file_path_name);
                debug!(path = %path.display(), file_type = %file.file_type, "referenced file");
                if let Some(previous) = set.files.insert(path.clone(), file.file_type.clone()) {
                    warn!(
                        path = %path.display(),
                        previous = %previous,
                        kept = %file.file_type,
                        "two file entries resolve to the same path"
                    );
                    set.collisions.push(Collision {
                        path,
                        previous,
                        kept: file.file_type.clone(),
                    });
                }
            }
        }
        set.missing = set.find_missing();
        set
    }

    /// Re-checks every path without rebuilding the set.
    pub fn find_missing(&self) -> Vec<PathBuf> {
        self.files
            .keys()
            .filter(|path| !path.is_file())
            .cloned()
            .collect()
    }

    /// Missing paths found when the set was collected.
    pub fn missing(&self) -> &[PathBuf] {
        &self.missing
    }

    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<&FileType> {
        self.files.get(path)
    }

    /// Iterates paths in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &FileType)> {
        self.files.iter().map(|(path, file_type)| (path.as_path(), file_type))
    }
}
