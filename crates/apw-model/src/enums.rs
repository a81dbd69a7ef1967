//! Typed enumerations for workspace metadata.
//!
//! The descriptor stores these values as free-form strings. Every enum here
//! keeps an `Unrecognized` escape hatch so that a value written by a newer
//! editor survives a decode/encode cycle untouched.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Archive folder for sources and compiled tokens.
pub const FOLDER_SOURCE: &str = "Source";
/// Archive folder for include files.
pub const FOLDER_INCLUDES: &str = "Includes";
/// Archive folder for IR files and databases.
pub const FOLDER_IR_FILES: &str = "IR Files";
/// Archive folder for touch panel and keypad designs.
pub const FOLDER_INTERFACES: &str = "Interfaces";
/// Archive folder for modules.
pub const FOLDER_MODULES: &str = "Modules";
/// Archive folder for everything else.
pub const FOLDER_OTHER: &str = "Other";

/// All archive folders in routing-table order.
pub const FOLDERS: [&str; 6] = [
    FOLDER_SOURCE,
    FOLDER_INCLUDES,
    FOLDER_IR_FILES,
    FOLDER_INTERFACES,
    FOLDER_MODULES,
    FOLDER_OTHER,
];

/// Returns the canonical archive folder for a declared file type string.
///
/// Matching is exact and case-sensitive. The same table drives both
/// descriptor path relativization and archive entry placement.
pub fn file_folder(declared_type: &str) -> &'static str {
    match declared_type {
        "TKN" | "Source" | "MasterSrc" => FOLDER_SOURCE,
        "Include" => FOLDER_INCLUDES,
        "IR" | "AMX_IR_DB" | "IRN_DB" => FOLDER_IR_FILES,
        "TP4" | "TP5" | "TPD" | "KPD" => FOLDER_INTERFACES,
        "XDD" | "Module" | "DUET" | "TKO" => FOLDER_MODULES,
        _ => FOLDER_OTHER,
    }
}

/// Declared type of a file entry (`Type` attribute).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FileType {
    #[default]
    Source,
    MasterSrc,
    Include,
    Module,
    Axb,
    Ir,
    Tpd,
    Tp4,
    Tp5,
    Kpd,
    Tko,
    Irdb,
    Irndb,
    Other,
    Duet,
    Tok,
    Tkn,
    Kpb,
    Xdd,
    /// A type string this crate does not know; kept verbatim.
    Unrecognized(String),
}

impl FileType {
    /// Returns the spelling used in the descriptor.
    pub fn as_str(&self) -> &str {
        match self {
            FileType::Source => "Source",
            FileType::MasterSrc => "MasterSrc",
            FileType::Include => "Include",
            FileType::Module => "Module",
            FileType::Axb => "AXB",
            FileType::Ir => "IR",
            FileType::Tpd => "TPD",
            FileType::Tp4 => "TP4",
            FileType::Tp5 => "TP5",
            FileType::Kpd => "KPD",
            FileType::Tko => "TKO",
            FileType::Irdb => "IRDB",
            FileType::Irndb => "IRNDB",
            FileType::Other => "Other",
            FileType::Duet => "Duet",
            FileType::Tok => "TOK",
            FileType::Tkn => "TKN",
            FileType::Kpb => "KPB",
            FileType::Xdd => "XDD",
            FileType::Unrecognized(value) => value,
        }
    }

    /// Archive folder this type is routed to.
    ///
    /// Routing matches the type attribute exactly, and the routing table uses
    /// different spellings from the named variants for three kinds:
    /// [`FileType::Duet`] (`"Duet"`), [`FileType::Irdb`] (`"IRDB"`) and
    /// [`FileType::Irndb`] (`"IRNDB"`) all land in `Other`. Descriptors that
    /// spell them `"DUET"`, `"AMX_IR_DB"` or `"IRN_DB"` decode as
    /// [`FileType::Unrecognized`] and route to `Modules` or `IR Files`.
    pub fn folder(&self) -> &'static str {
        file_folder(self.as_str())
    }

    /// True for the main program kinds (`Source`, `MasterSrc`).
    pub fn is_source(&self) -> bool {
        matches!(self, FileType::Source | FileType::MasterSrc)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for FileType {
    fn from(value: &str) -> Self {
        match value {
            "Source" => FileType::Source,
            "MasterSrc" => FileType::MasterSrc,
            "Include" => FileType::Include,
            "Module" => FileType::Module,
            "AXB" => FileType::Axb,
            "IR" => FileType::Ir,
            "TPD" => FileType::Tpd,
            "TP4" => FileType::Tp4,
            "TP5" => FileType::Tp5,
            "KPD" => FileType::Kpd,
            "TKO" => FileType::Tko,
            "IRDB" => FileType::Irdb,
            "IRNDB" => FileType::Irndb,
            "Other" => FileType::Other,
            "Duet" => FileType::Duet,
            "TOK" => FileType::Tok,
            "TKN" => FileType::Tkn,
            "KPB" => FileType::Kpb,
            "XDD" => FileType::Xdd,
            other => FileType::Unrecognized(other.to_string()),
        }
    }
}

impl FromStr for FileType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FileType::from(s))
    }
}

impl From<String> for FileType {
    fn from(value: String) -> Self {
        FileType::from(value.as_str())
    }
}

impl From<FileType> for String {
    fn from(value: FileType) -> Self {
        value.as_str().to_string()
    }
}

/// Compiler selection for a file (`CompileType` attribute).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CompileType {
    #[default]
    None,
    Netlinx,
    Axcess,
    Unrecognized(String),
}

impl CompileType {
    pub fn as_str(&self) -> &str {
        match self {
            CompileType::None => "None",
            CompileType::Netlinx => "Netlinx",
            CompileType::Axcess => "Axcess",
            CompileType::Unrecognized(value) => value,
        }
    }
}

impl fmt::Display for CompileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for CompileType {
    fn from(value: &str) -> Self {
        match value {
            "None" => CompileType::None,
            "Netlinx" => CompileType::Netlinx,
            "Axcess" => CompileType::Axcess,
            other => CompileType::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for CompileType {
    fn from(value: String) -> Self {
        CompileType::from(value.as_str())
    }
}

impl From<CompileType> for String {
    fn from(value: CompileType) -> Self {
        value.as_str().to_string()
    }
}

/// Deployment profile a workspace is converted to before packaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Profile {
    /// Editable sources, no conversion.
    #[default]
    Source,
    /// Compiled main programs only.
    Release,
    /// Sources plus compiled modules.
    Handover,
    /// Reserved; converts nothing.
    Full,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Source => "Source",
            Profile::Release => "Release",
            Profile::Handover => "Handover",
            Profile::Full => "Full",
        }
    }

    /// Letter appended to build tags for packages of this profile.
    pub fn build_suffix(&self) -> char {
        match self {
            Profile::Source => 'A',
            Profile::Release => 'R',
            Profile::Handover => 'H',
            Profile::Full => 'F',
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
