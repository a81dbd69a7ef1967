use serde::{Deserialize, Serialize};

use crate::enums::{CompileType, FileType};
use crate::path::{extension_of, file_name_of, replace_extension};

/// Address assigned to device maps synthesized for compiled programs.
pub const CUSTOM_DEVICE_ADDRESS: &str = "Custom [0:1:0]";

/// A file referenced by a system.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct File {
    pub identifier: String,
    /// Absolute, or relative to the directory holding the descriptor.
    pub file_path_name: String,
    pub comments: String,
    pub master_directory: String,
    pub device_maps: Vec<DeviceMap>,
    pub irdbs: Vec<Irdb>,
    pub file_type: FileType,
    pub compile_type: CompileType,
}

impl File {
    /// Creates a file entry whose identifier is the basename of `path`.
    pub fn new(path: impl Into<String>, file_type: FileType, compile_type: CompileType) -> Self {
        let file_path_name = path.into();
        Self {
            identifier: file_name_of(&file_path_name).to_string(),
            file_path_name,
            file_type,
            compile_type,
            ..Self::default()
        }
    }

    pub fn file_name(&self) -> &str {
        file_name_of(&self.file_path_name)
    }

    /// Extension of the stored path including the dot, or `""`.
    pub fn extension(&self) -> &str {
        extension_of(&self.file_path_name)
    }

    /// Rewrites the stored path to end in `.{ext}`. The identifier is left alone.
    pub fn change_extension(&mut self, ext: &str) {
        self.file_path_name = replace_extension(&self.file_path_name, ext);
    }

    pub fn add_device_map(&mut self, device_map: DeviceMap) {
        self.device_maps.push(device_map);
    }

    pub fn add_irdb(&mut self, irdb: Irdb) {
        self.irdbs.push(irdb);
    }
}

/// Device address mapping attached to a file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceMap {
    pub dev_addr: String,
    pub dev_name: String,
}

impl DeviceMap {
    pub fn new(dev_addr: impl Into<String>, dev_name: impl Into<String>) -> Self {
        Self {
            dev_addr: dev_addr.into(),
            dev_name: dev_name.into(),
        }
    }

    /// The placeholder map given to compiled programs that have none.
    pub fn custom() -> Self {
        Self::new(CUSTOM_DEVICE_ADDRESS, CUSTOM_DEVICE_ADDRESS)
    }
}

/// IR database reference attached to a file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Irdb {
    pub db_key: String,
    pub property: String,
    pub dos_name: String,
    pub user_db_path_name: String,
    pub notes: String,
}
