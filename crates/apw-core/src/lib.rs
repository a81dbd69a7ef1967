//! Packaging of NetLinx workspaces.
//!
//! Loads a descriptor, converts it to a deployment [`Profile`], gathers the
//! files it references and writes everything into one zip archive:
//!
//! ```no_run
//! use apw_core::{PackageOptions, WorkspaceFile, package};
//! use apw_model::Profile;
//!
//! let source = WorkspaceFile::load("Site/Headquarters.apw")?;
//! let options = PackageOptions {
//!     profile: Profile::Release,
//!     ..PackageOptions::default()
//! };
//! let outcome = package(&source, &options)?;
//! println!("wrote {}", outcome.archive.display());
//! # Ok::<(), apw_core::PackError>(())
//! ```
//!
//! [`Profile`]: apw_model::Profile

pub mod archive;
pub mod convert;
pub mod discovery;
mod error;
pub mod fileset;
pub mod package;
pub mod paths;
pub mod workspace_file;

pub use archive::{archive_name, assemble};
pub use convert::{ConversionSummary, FileAction, classify, convert_system, convert_workspace};
pub use discovery::{find_workspaces, load_workspaces};
pub use error::{PackError, Result};
pub use fileset::{Collision, FileSet};
pub use package::{
    DEFAULT_OUTPUT_FOLDER, PackageOptions, PackageOutcome, build_id, build_tag, package,
};
pub use paths::{resolve, set_absolute_filepaths, set_relative_filepaths};
pub use workspace_file::WorkspaceFile;
