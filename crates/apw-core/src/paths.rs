//! Path resolution for file entries.
//!
//! A stored path is either absolute, or relative to the directory that holds
//! the descriptor (the origin). Each file is resolved on its own; there is no
//! notion of a current directory carried between entries.

use std::path::{Component, Path, PathBuf};

use apw_model::{FileType, Workspace};

pub use apw_model::{extension_of, file_name_of};

/// Converts a stored path to the host's separator convention.
///
/// Descriptors are authored on Windows, so on other hosts a backslash is
/// treated as a directory separator.
pub fn native_path(stored: &str) -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(stored)
    } else {
        PathBuf::from(stored.replace('\\', "/"))
    }
}

/// Absolute location of a stored path.
///
/// `.` and `..` components are folded lexically, so two spellings of the same
/// file resolve to one path. Symlinks are not followed.
pub fn resolve(origin: &Path, stored: &str) -> PathBuf {
    let path = native_path(stored);
    if path.is_absolute() {
        normalize(&path)
    } else {
        normalize(&origin.join(path))
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` above the root stays at the root.
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Type-routed relative path: `<folder>/<basename>`.
pub fn relative_path(file_type: &FileType, stored: &str) -> String {
    Path::new(file_type.folder())
        .join(file_name_of(stored))
        .to_string_lossy()
        .into_owned()
}

/// Rewrites every file path to its type-routed relative form.
///
/// Any existing directory structure is discarded.
pub fn set_relative_filepaths(workspace: &mut Workspace) {
    for system in workspace.systems_mut() {
        for file in &mut system.files {
            file.file_path_name = relative_path(&file.file_type, &file.file_path_name);
        }
    }
}

/// Prefixes every relative file path with `base`. Absolute paths are left alone,
/// so applying this twice with the same base changes nothing further.
pub fn set_absolute_filepaths(workspace: &mut Workspace, base: &Path) {
    for system in workspace.systems_mut() {
        for file in &mut system.files {
            if native_path(&file.file_path_name).is_absolute() {
                continue;
            }
            file.file_path_name = resolve(base, &file.file_path_name)
                .to_string_lossy()
                .into_owned();
        }
    }
}
