//! Zip packaging of a workspace and its referenced files.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Local, Timelike};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use apw_model::{FileType, Workspace, file_name_of};

use crate::error::{PackError, Result};
use crate::fileset::FileSet;

/// Archive file name: `<identifier>[_<build_tag>].zip`.
pub fn archive_name(identifier: &str, build_tag: Option<&str>) -> String {
    match build_tag {
        Some(tag) if !tag.is_empty() => format!("{identifier}_{tag}.zip"),
        _ => format!("{identifier}.zip"),
    }
}

/// Entry name for a referenced file: `<folder>/<basename>`.
pub fn entry_name(file_type: &FileType, path: &Path) -> String {
    let path = path.to_string_lossy();
    format!("{}/{}", file_type.folder(), file_name_of(&path))
}

/// Writes every file of `files` followed by the encoded workspace into
/// `<dest_dir>/<identifier>[_<build_tag>].zip`.
///
/// Fails with [`PackError::MissingFiles`] before anything is created when a
/// referenced file is absent. A failure after the archive was created leaves
/// the partial file on disk.
pub fn assemble(
    workspace: &mut Workspace,
    identifier: &str,
    files: &FileSet,
    dest_dir: &Path,
    build_tag: Option<&str>,
) -> Result<PathBuf> {
    let missing = files.find_missing();
    if !missing.is_empty() {
        return Err(PackError::MissingFiles { missing });
    }

    let descriptor = apw_xml::encode(workspace)?;

    fs::create_dir_all(dest_dir).map_err(|e| PackError::io(dest_dir, e))?;
    let archive_path = dest_dir.join(archive_name(identifier, build_tag));
    let output = fs::File::create(&archive_path).map_err(|e| PackError::io(&archive_path, e))?;
    let mut zip = ZipWriter::new(output);

    for (path, file_type) in files.iter() {
        let name = entry_name(file_type, path);
        add_file(&mut zip, &archive_path, path, &name)?;
        debug!(entry = %name, source = %path.display(), "archived file");
    }

    let descriptor_name = format!("{identifier}.apw");
    zip.start_file(descriptor_name.as_str(), entry_options())
        .map_err(|e| PackError::zip(&archive_path, &e))?;
    zip.write_all(&descriptor)
        .map_err(|e| PackError::io(&archive_path, e))?;
    zip.finish().map_err(|e| PackError::zip(&archive_path, &e))?;

    info!(
        archive = %archive_path.display(),
        files = files.len(),
        "wrote archive"
    );
    Ok(archive_path)
}

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

fn add_file(
    zip: &mut ZipWriter<fs::File>,
    archive_path: &Path,
    source: &Path,
    name: &str,
) -> Result<()> {
    let mut input = fs::File::open(source).map_err(|e| PackError::io(source, e))?;
    let metadata = input.metadata().map_err(|e| PackError::io(source, e))?;

    let mut options = entry_options();
    if let Some(modified) = metadata.modified().ok().and_then(zip_timestamp) {
        options = options.last_modified_time(modified);
    }
    if let Some(mode) = unix_mode(&metadata) {
        options = options.unix_permissions(mode);
    }

    zip.start_file(name, options)
        .map_err(|e| PackError::zip(archive_path, &e))?;
    io::copy(&mut input, zip).map_err(|e| PackError::io(source, e))?;
    Ok(())
}

/// Zip timestamps are local time with two-second resolution from 1980 on.
fn zip_timestamp(modified: std::time::SystemTime) -> Option<zip::DateTime> {
    let local: DateTime<Local> = modified.into();
    let year = u16::try_from(local.year()).ok()?;
    zip::DateTime::from_date_and_time(
        year,
        u8::try_from(local.month()).ok()?,
        u8::try_from(local.day()).ok()?,
        u8::try_from(local.hour()).ok()?,
        u8::try_from(local.minute()).ok()?,
        u8::try_from(local.second()).ok()?,
    )
    .ok()
}

#[cfg(unix)]
fn unix_mode(metadata: &fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(metadata.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn unix_mode(_metadata: &fs::Metadata) -> Option<u32> {
    None
}
