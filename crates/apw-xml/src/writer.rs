//! Descriptor encoding.

use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use regex::bytes::Regex;

use apw_model::{DeviceMap, File, Irdb, Project, SCHEMA_VERSION, System, Workspace};

use crate::error::EncodeError;

/// Line break inserted after every closing tag.
pub const LINE_BREAK: &str = "\r\n";

static CLOSING_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</[^>]+>").expect("closing tag pattern is valid"));

type Result<T> = std::result::Result<T, EncodeError>;

/// Encodes a workspace as descriptor markup.
///
/// Sets `current_version` to the fixed schema version before writing.
/// Optional elements are omitted when empty.
pub fn encode(workspace: &mut Workspace) -> Result<Vec<u8>> {
    workspace.current_version = SCHEMA_VERSION.to_string();

    let mut xml = Writer::new(Vec::new());
    emit(
        &mut xml,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    emit(&mut xml, Event::Text(BytesText::new(LINE_BREAK)))?;
    write_root(&mut xml, workspace)?;

    let raw = xml.into_inner();
    Ok(break_after_closing_tags(&raw))
}

/// Encodes `workspace` and writes it to `path`, creating parent directories.
pub fn write_workspace(path: &Path, workspace: &mut Workspace) -> Result<()> {
    let bytes = encode(workspace)?;
    let io_error = |source| EncodeError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
    }
    std::fs::write(path, bytes).map_err(io_error)?;
    tracing::debug!(path = %path.display(), "wrote descriptor");
    Ok(())
}

fn break_after_closing_tags(raw: &[u8]) -> Vec<u8> {
    let replacement = format!("${{0}}{LINE_BREAK}");
    CLOSING_TAG
        .replace_all(raw, replacement.as_bytes())
        .into_owned()
}

fn emit<W: Write>(xml: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    xml.write_event(event)
        .map_err(|e| EncodeError::Xml(e.to_string()))
}

/// Writes `<name>text</name>`, even when `text` is empty.
fn text_element<W: Write>(xml: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    emit(xml, Event::Start(BytesStart::new(name)))?;
    emit(xml, Event::Text(BytesText::new(text)))?;
    emit(xml, Event::End(BytesEnd::new(name)))
}

fn optional_element<W: Write>(xml: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    text_element(xml, name, text)
}

fn write_root<W: Write>(xml: &mut Writer<W>, workspace: &Workspace) -> Result<()> {
    let mut root = BytesStart::new("Workspace");
    root.push_attribute(("CurrentVersion", workspace.current_version.as_str()));
    emit(xml, Event::Start(root))?;
    text_element(xml, "Identifier", &workspace.identifier)?;
    text_element(xml, "CreateVersion", &workspace.create_version)?;
    optional_element(xml, "PJS_File", &workspace.pjs_file)?;
    optional_element(xml, "PJS_ConvertDate", &workspace.pjs_convert_date)?;
    optional_element(xml, "PJS_CreateDate", &workspace.pjs_create_date)?;
    optional_element(xml, "Comments", &workspace.comments)?;
    for project in workspace.projects() {
        write_project(xml, project)?;
    }
    emit(xml, Event::End(BytesEnd::new("Workspace")))
}

fn write_project<W: Write>(xml: &mut Writer<W>, project: &Project) -> Result<()> {
    emit(xml, Event::Start(BytesStart::new("Project")))?;
    text_element(xml, "Identifier", project.identifier())?;
    optional_element(xml, "Designer", &project.designer)?;
    optional_element(xml, "DealerID", &project.dealer_id)?;
    optional_element(xml, "SalesOrder", &project.sales_order)?;
    optional_element(xml, "PurchaseOrder", &project.purchase_order)?;
    optional_element(xml, "Comments", &project.comments)?;
    for system in project.systems() {
        write_system(xml, system)?;
    }
    emit(xml, Event::End(BytesEnd::new("Project")))
}

fn write_system<W: Write>(xml: &mut Writer<W>, system: &System) -> Result<()> {
    let mut start = BytesStart::new("System");
    start.push_attribute(("IsActive", system.is_active.as_str()));
    start.push_attribute(("Platform", system.platform.as_str()));
    start.push_attribute(("Transport", system.transport.as_str()));
    start.push_attribute(("TransportEx", system.transport_ex.as_str()));
    emit(xml, Event::Start(start))?;
    text_element(xml, "Identifier", system.identifier())?;
    text_element(xml, "SysID", &system.sys_id.to_string())?;
    optional_element(xml, "TransTCPIP", &system.trans_tcpip)?;
    optional_element(xml, "TransSerial", &system.trans_serial)?;
    optional_element(xml, "TransTCPIPEx", &system.trans_tcpip_ex)?;
    optional_element(xml, "TransSerialEx", &system.trans_serial_ex)?;
    optional_element(xml, "TransUSBEx", &system.trans_usb_ex)?;
    optional_element(xml, "TransVNMEx", &system.trans_vnm_ex)?;
    optional_element(
        xml,
        "VirtualNetLinxMasterFlag",
        &system.virtual_netlinx_master_flag,
    )?;
    optional_element(xml, "VNMSystemID", &system.vnm_system_id)?;
    optional_element(xml, "VNMIPAddress", &system.vnm_ip_address)?;
    optional_element(xml, "VNMMaskAddress", &system.vnm_mask_address)?;
    optional_element(xml, "UserName", &system.user_name)?;
    optional_element(xml, "Password", &system.password)?;
    optional_element(xml, "Comments", &system.comments)?;
    for file in &system.files {
        write_file(xml, file)?;
    }
    emit(xml, Event::End(BytesEnd::new("System")))
}

fn write_file<W: Write>(xml: &mut Writer<W>, file: &File) -> Result<()> {
    let mut start = BytesStart::new("File");
    start.push_attribute(("Type", file.file_type.as_str()));
    start.push_attribute(("CompileType", file.compile_type.as_str()));
    emit(xml, Event::Start(start))?;
    text_element(xml, "Identifier", &file.identifier)?;
    text_element(xml, "FilePathName", &file.file_path_name)?;
    optional_element(xml, "Comments", &file.comments)?;
    optional_element(xml, "MasterDirectory", &file.master_directory)?;
    for device_map in &file.device_maps {
        write_device_map(xml, device_map)?;
    }
    for irdb in &file.irdbs {
        write_irdb(xml, irdb)?;
    }
    emit(xml, Event::End(BytesEnd::new("File")))
}

fn write_device_map<W: Write>(xml: &mut Writer<W>, device_map: &DeviceMap) -> Result<()> {
    let mut start = BytesStart::new("DeviceMap");
    start.push_attribute(("DevAddr", device_map.dev_addr.as_str()));
    emit(xml, Event::Start(start))?;
    optional_element(xml, "DevName", &device_map.dev_name)?;
    emit(xml, Event::End(BytesEnd::new("DeviceMap")))
}

fn write_irdb<W: Write>(xml: &mut Writer<W>, irdb: &Irdb) -> Result<()> {
    let mut start = BytesStart::new("IRDB");
    start.push_attribute(("DBKey", irdb.db_key.as_str()));
    emit(xml, Event::Start(start))?;
    text_element(xml, "Property", &irdb.property)?;
    text_element(xml, "DOSName", &irdb.dos_name)?;
    text_element(xml, "UserDBPathName", &irdb.user_db_path_name)?;
    text_element(xml, "Notes", &irdb.notes)?;
    emit(xml, Event::End(BytesEnd::new("IRDB")))
}
