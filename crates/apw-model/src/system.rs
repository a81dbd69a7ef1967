use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::file::File;

/// Default NetLinx ICSP port for IP connections.
pub const DEFAULT_ICSP_PORT: u16 = 1319;

/// One control system inside a project.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct System {
    identifier: String,
    pub sys_id: u32,
    pub trans_tcpip: String,
    pub trans_serial: String,
    pub trans_tcpip_ex: String,
    pub trans_serial_ex: String,
    pub trans_usb_ex: String,
    pub trans_vnm_ex: String,
    pub virtual_netlinx_master_flag: String,
    pub vnm_system_id: String,
    pub vnm_ip_address: String,
    pub vnm_mask_address: String,
    pub user_name: String,
    pub password: String,
    pub comments: String,
    /// Files in the order they were added.
    pub files: Vec<File>,
    pub is_active: String,
    pub platform: String,
    pub transport: String,
    pub transport_ex: String,
}

impl System {
    /// Creates a system identified as `"NNN: name"`.
    pub fn new(name: &str, sys_id: u32) -> Self {
        Self {
            identifier: format!("{sys_id:03}: {name}"),
            sys_id,
            ..Self::default()
        }
    }

    /// Creates a system with a verbatim identifier, as read from a descriptor.
    pub fn with_identifier(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn add_file(&mut self, file: File) {
        self.files.push(file);
    }

    pub fn find_file(&self, identifier: &str) -> Option<&File> {
        self.files.iter().find(|file| file.identifier == identifier)
    }

    pub fn find_file_mut(&mut self, identifier: &str) -> Option<&mut File> {
        self.files
            .iter_mut()
            .find(|file| file.identifier == identifier)
    }

    /// Stores `transport` in the extended connection fields.
    pub fn set_connection(&mut self, transport: &Transport) {
        self.transport_ex = transport.kind.clone();
        self.trans_tcpip_ex = transport.to_string();
    }

    /// Parses the extended IP connection, if one is stored.
    pub fn connection(&self) -> Option<Transport> {
        if self.trans_tcpip_ex.is_empty() {
            return None;
        }
        let mut transport: Transport = self.trans_tcpip_ex.parse().ok()?;
        if !self.transport_ex.is_empty() {
            transport.kind = self.transport_ex.clone();
        }
        Some(transport)
    }
}

/// Connection details used to populate a system's transport fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transport {
    pub kind: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub ping_test: bool,
    pub username: String,
    pub password: String,
}

impl Transport {
    /// TCP/IP transport on the default port.
    pub fn ip(host: impl Into<String>) -> Self {
        Self {
            kind: "TCPIP".to_string(),
            host: host.into(),
            port: DEFAULT_ICSP_PORT,
            name: String::new(),
            ping_test: false,
            username: String::new(),
            password: String::new(),
        }
    }
}

/// Formats as `host|port|ping|name|username|password`.
impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}|{}",
            self.host,
            self.port,
            u8::from(self.ping_test),
            self.name,
            self.username,
            self.password
        )
    }
}

impl FromStr for Transport {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ModelError::InvalidTransport {
            value: s.to_string(),
            reason: reason.to_string(),
        };
        let parts: Vec<&str> = s.split('|').collect();
        if parts.len() != 6 {
            return Err(invalid("expected 6 '|' separated fields"));
        }
        let port = parts[1]
            .trim()
            .parse::<u16>()
            .map_err(|_| invalid("port is not a number"))?;
        let ping_test = match parts[2].trim() {
            "1" => true,
            "0" | "" => false,
            _ => return Err(invalid("ping flag must be 0 or 1")),
        };
        Ok(Self {
            kind: "TCPIP".to_string(),
            host: parts[0].to_string(),
            port,
            name: parts[3].to_string(),
            ping_test,
            username: parts[4].to_string(),
            password: parts[5].to_string(),
        })
    }
}
