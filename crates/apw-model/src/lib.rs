//! Data model for AMX NetLinx workspace (`.apw`) descriptors.
//!
//! A [`Workspace`] owns its [`Project`]s, each project owns its [`System`]s,
//! and each system owns the [`File`] entries that make up the deployment.

pub mod enums;
pub mod error;
pub mod file;
pub mod path;
pub mod system;
pub mod workspace;

pub use enums::{CompileType, FOLDERS, FileType, Profile, file_folder};
pub use error::{ModelError, Result};
pub use file::{CUSTOM_DEVICE_ADDRESS, DeviceMap, File, Irdb};
pub use path::{extension_of, file_name_of, replace_extension};
pub use system::{DEFAULT_ICSP_PORT, System, Transport};
pub use workspace::{Project, SCHEMA_VERSION, Workspace};
