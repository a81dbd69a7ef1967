//! The packaging pipeline: narrow, convert, collect, relativize, archive.

use std::path::PathBuf;

use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;
use tracing::info;

use apw_model::Profile;

use crate::archive;
use crate::convert::{ConversionSummary, convert_workspace};
use crate::error::{PackError, Result};
use crate::fileset::{Collision, FileSet};
use crate::paths::set_relative_filepaths;
use crate::workspace_file::WorkspaceFile;

/// Default folder, under the descriptor's directory, that packages go to.
pub const DEFAULT_OUTPUT_FOLDER: &str = "PackUp";

/// What to package and where.
#[derive(Debug, Clone, Default)]
pub struct PackageOptions {
    pub profile: Profile,
    /// Keep only this project.
    pub project: Option<String>,
    /// Keep only this system (searched in the remaining projects).
    pub system: Option<String>,
    /// Destination directory; `<origin>/PackUp` when unset.
    pub output_dir: Option<PathBuf>,
    /// Build tag; `<build_id><profile letter>` for the current time when unset.
    pub build_tag: Option<String>,
}

/// Result of one packaging run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageOutcome {
    pub profile: Profile,
    pub archive: PathBuf,
    pub build_tag: String,
    pub conversion: ConversionSummary,
    pub file_count: usize,
    pub collisions: Vec<Collision>,
}

/// Build identifier for `now`: `YYYY_MM_DD_<seconds since midnight>`, in UTC.
pub fn build_id(now: DateTime<Utc>) -> String {
    format!(
        "{}{}",
        now.format("%Y_%m_%d_"),
        now.num_seconds_from_midnight()
    )
}

/// Build tag for a package of `profile` made at `now`.
pub fn build_tag(now: DateTime<Utc>, profile: Profile) -> String {
    format!("{}{}", build_id(now), profile.build_suffix())
}

/// Packages `source` according to `options`.
///
/// Works on a copy of the workspace; `source` is not modified.
pub fn package(source: &WorkspaceFile, options: &PackageOptions) -> Result<PackageOutcome> {
    info!(
        workspace = source.identifier(),
        profile = %options.profile,
        "packing workspace"
    );

    let mut workspace = source.workspace.clone();
    if let Some(project) = &options.project {
        if !workspace.retain_project(project) {
            return Err(PackError::ProjectNotFound {
                identifier: project.clone(),
            });
        }
    }
    if let Some(system) = &options.system {
        if !workspace.retain_system(system) {
            return Err(PackError::SystemNotFound {
                identifier: system.clone(),
            });
        }
    }

    let conversion = convert_workspace(&mut workspace, options.profile);

    let files = FileSet::collect(&workspace, source.origin());
    if !files.is_complete() {
        return Err(PackError::MissingFiles {
            missing: files.missing().to_vec(),
        });
    }

    set_relative_filepaths(&mut workspace);

    let tag = options
        .build_tag
        .clone()
        .unwrap_or_else(|| build_tag(Utc::now(), options.profile));
    let dest_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| source.origin().join(DEFAULT_OUTPUT_FOLDER));

    let archive = archive::assemble(
        &mut workspace,
        source.identifier(),
        &files,
        &dest_dir,
        Some(&tag),
    )?;

    info!(archive = %archive.display(), profile = %options.profile, "completed package");
    Ok(PackageOutcome {
        profile: options.profile,
        archive,
        build_tag: tag,
        conversion,
        file_count: files.len(),
        collisions: files.collisions().to_vec(),
    })
}
