//! Reader and writer for NetLinx workspace (`.apw`) descriptors.
//!
//! # Example
//!
//! ```
//! use apw_model::{Project, Workspace};
//!
//! let mut workspace = Workspace::new("Site");
//! workspace.add_project(Project::new("P1"));
//!
//! let bytes = apw_xml::encode(&mut workspace).unwrap();
//! let decoded = apw_xml::decode(&bytes).unwrap();
//! assert_eq!(decoded.projects()[0].identifier(), "P1");
//! ```
//!
//! Encoding always stamps `CurrentVersion="4.0"` and puts a line break after
//! every closing tag; decoding ignores that layout whitespace.

mod error;
pub mod reader;
pub mod writer;

pub use error::{EncodeError, FormatError};
pub use reader::{decode, read_workspace};
pub use writer::{LINE_BREAK, encode, write_workspace};
