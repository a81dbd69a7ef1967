//! A descriptor on disk together with its decoded workspace.

use std::path::{Path, PathBuf};

use tracing::info;

use apw_model::Workspace;

use crate::archive;
use crate::error::{PackError, Result};
use crate::fileset::FileSet;
use crate::paths;

/// A loaded `.apw` file.
///
/// The identifier is the descriptor's file stem; relative file paths inside
/// the workspace are resolved against the directory holding it (the origin).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceFile {
    path: PathBuf,
    identifier: String,
    origin: PathBuf,
    pub workspace: Workspace,
}

impl WorkspaceFile {
    /// Reads and decodes the descriptor at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| PackError::io(path, e))?;
        let file = Self::from_bytes(path, &bytes)?;
        info!(
            path = %path.display(),
            projects = file.workspace.projects().len(),
            "loaded workspace"
        );
        Ok(file)
    }

    /// Decodes `bytes` as if they were read from `path`.
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: &[u8]) -> Result<Self> {
        let workspace = apw_xml::decode(bytes)?;
        Ok(Self::new(path, workspace))
    }

    /// Pairs an in-memory workspace with the path it belongs at.
    pub fn new(path: impl Into<PathBuf>, workspace: Workspace) -> Self {
        let path = path.into();
        let identifier = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let origin = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            path,
            identifier,
            origin,
            workspace,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// Absolute location of a stored file path.
    pub fn resolve(&self, file_path: &str) -> PathBuf {
        paths::resolve(&self.origin, file_path)
    }

    /// Encodes the workspace back to [`Self::path`].
    pub fn save(&mut self) -> Result<()> {
        apw_xml::write_workspace(&self.path, &mut self.workspace)?;
        Ok(())
    }

    /// Encodes the workspace to another location, leaving this handle unchanged.
    pub fn save_as(&mut self, path: &Path) -> Result<()> {
        apw_xml::write_workspace(path, &mut self.workspace)?;
        Ok(())
    }

    /// Collects and verifies every file the workspace references.
    pub fn file_set(&self) -> FileSet {
        FileSet::collect(&self.workspace, &self.origin)
    }

    /// Archives the workspace and its files into `dest_dir`.
    ///
    /// The archived descriptor has its paths rewritten to the type-routed
    /// relative layout; this handle's workspace is left untouched.
    pub fn export_archive(&self, dest_dir: &Path, build_tag: Option<&str>) -> Result<PathBuf> {
        let files = self.file_set();
        if !files.is_complete() {
            return Err(PackError::MissingFiles {
                missing: files.missing().to_vec(),
            });
        }
        let mut packaged = self.workspace.clone();
        paths::set_relative_filepaths(&mut packaged);
        archive::assemble(&mut packaged, &self.identifier, &files, dest_dir, build_tag)
    }
}
