//! Descriptor decoding.
//!
//! The markup is first read into a small element tree and then mapped onto
//! the model. Mapping is tolerant: unknown elements and attributes are
//! skipped and absent ones default to empty strings or zero.

use std::borrow::Cow;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use apw_model::{CompileType, DeviceMap, File, FileType, Irdb, Project, System, Workspace};

use crate::error::FormatError;

const UTF8_BOM: &str = "\u{feff}";

/// Decodes descriptor bytes into a [`Workspace`].
///
/// Empty or whitespace-only input yields an empty workspace. Projects and
/// systems come back sorted by identifier.
pub fn decode(bytes: &[u8]) -> Result<Workspace, FormatError> {
    let text = std::str::from_utf8(bytes)?;
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
    if text.trim().is_empty() {
        tracing::debug!("empty descriptor input, starting a new workspace");
        return Ok(Workspace::default());
    }
    let root = parse_tree(text)?;
    if root.name != "Workspace" {
        return Err(FormatError::UnexpectedRoot { name: root.name });
    }
    Ok(workspace_from(&root))
}

/// Reads and decodes a descriptor file.
pub fn read_workspace(path: &Path) -> Result<Workspace, FormatError> {
    let bytes = std::fs::read(path).map_err(|source| FormatError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    decode(&bytes)
}

#[derive(Debug, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    fn attr(&self, name: &str) -> &str {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map_or("", |(_, value)| value.as_str())
    }

    /// Text of the first child called `name`, or `""`.
    fn child_text(&self, name: &str) -> &str {
        self.children
            .iter()
            .find(|child| child.name == name)
            .map_or("", Element::leaf_text)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Leaf text verbatim. Elements with children carry only layout whitespace.
    fn leaf_text(&self) -> &str {
        if self.children.is_empty() {
            &self.text
        } else {
            ""
        }
    }
}

fn parse_tree(text: &str) -> Result<Element, FormatError> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = reader.buffer_position() as u64;
        let syntax = |message: String| FormatError::Syntax { position, message };
        match reader.read_event() {
            Ok(Event::Start(start)) => stack.push(open_element(&start).map_err(syntax)?),
            Ok(Event::Empty(start)) => {
                let element = open_element(&start).map_err(syntax)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| syntax("closing tag without opening tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(content)) => {
                if let Some(current) = stack.last_mut() {
                    let raw = String::from_utf8_lossy(&content);
                    let value = unescape(&raw).map_err(|e| syntax(e.to_string()))?;
                    current.text.push_str(&value);
                }
            }
            Ok(Event::CData(content)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&content));
                }
            }
            Ok(Event::GeneralRef(reference)) => {
                if let Some(current) = stack.last_mut() {
                    let name = String::from_utf8_lossy(&reference);
                    let entity = format!("&{name};");
                    let value = unescape(&entity).map_err(|e| syntax(e.to_string()))?;
                    current.text.push_str(&value);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(error) => return Err(syntax(error.to_string())),
        }
    }

    if let Some(open) = stack.last() {
        return Err(FormatError::Syntax {
            position: text.len() as u64,
            message: format!("unclosed element <{}>", open.name),
        });
    }
    root.ok_or(FormatError::MissingRoot)
}

fn open_element(start: &BytesStart<'_>) -> Result<Element, String> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attribute.value);
        let value = unescape(&raw).map_err(|e| e.to_string())?;
        attributes.push((key, Cow::into_owned(value)));
    }
    Ok(Element {
        name,
        attributes,
        ..Element::default()
    })
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), FormatError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(FormatError::MultipleRoots);
    }
    *root = Some(element);
    Ok(())
}

fn workspace_from(element: &Element) -> Workspace {
    let mut workspace = Workspace::default();
    workspace.identifier = element.child_text("Identifier").to_string();
    workspace.create_version = element.child_text("CreateVersion").to_string();
    workspace.current_version = element.attr("CurrentVersion").to_string();
    workspace.pjs_file = element.child_text("PJS_File").to_string();
    workspace.pjs_convert_date = element.child_text("PJS_ConvertDate").to_string();
    workspace.pjs_create_date = element.child_text("PJS_CreateDate").to_string();
    workspace.comments = element.child_text("Comments").to_string();
    workspace.set_projects(element.children_named("Project").map(project_from).collect());
    workspace
}

fn project_from(element: &Element) -> Project {
    let mut project = Project::new(element.child_text("Identifier"));
    project.designer = element.child_text("Designer").to_string();
    project.dealer_id = element.child_text("DealerID").to_string();
    project.sales_order = element.child_text("SalesOrder").to_string();
    project.purchase_order = element.child_text("PurchaseOrder").to_string();
    project.comments = element.child_text("Comments").to_string();
    project.set_systems(element.children_named("System").map(system_from).collect());
    project
}

fn system_from(element: &Element) -> System {
    let mut system = System::with_identifier(element.child_text("Identifier"));
    let raw_sys_id = element.child_text("SysID").trim();
    let sys_id = match raw_sys_id.parse() {
        Ok(sys_id) => sys_id,
        Err(_) => {
            if !raw_sys_id.is_empty() {
                tracing::debug!(
                    system = system.identifier(),
                    value = raw_sys_id,
                    "non-numeric SysID, using 0"
                );
            }
            0
        }
    };
    system.sys_id = sys_id;
    system.trans_tcpip = element.child_text("TransTCPIP").to_string();
    system.trans_serial = element.child_text("TransSerial").to_string();
    system.trans_tcpip_ex = element.child_text("TransTCPIPEx").to_string();
    system.trans_serial_ex = element.child_text("TransSerialEx").to_string();
    system.trans_usb_ex = element.child_text("TransUSBEx").to_string();
    system.trans_vnm_ex = element.child_text("TransVNMEx").to_string();
    system.virtual_netlinx_master_flag = element.child_text("VirtualNetLinxMasterFlag").to_string();
    system.vnm_system_id = element.child_text("VNMSystemID").to_string();
    system.vnm_ip_address = element.child_text("VNMIPAddress").to_string();
    system.vnm_mask_address = element.child_text("VNMMaskAddress").to_string();
    system.user_name = element.child_text("UserName").to_string();
    system.password = element.child_text("Password").to_string();
    system.comments = element.child_text("Comments").to_string();
    system.files = element.children_named("File").map(file_from).collect();
    system.is_active = element.attr("IsActive").to_string();
    system.platform = element.attr("Platform").to_string();
    system.transport = element.attr("Transport").to_string();
    system.transport_ex = element.attr("TransportEx").to_string();
    system
}

fn file_from(element: &Element) -> File {
    File {
        identifier: element.child_text("Identifier").to_string(),
        file_path_name: element.child_text("FilePathName").to_string(),
        comments: element.child_text("Comments").to_string(),
        master_directory: element.child_text("MasterDirectory").to_string(),
        device_maps: element
            .children_named("DeviceMap")
            .map(|map| DeviceMap::new(map.attr("DevAddr"), map.child_text("DevName")))
            .collect(),
        irdbs: element.children_named("IRDB").map(irdb_from).collect(),
        file_type: FileType::from(element.attr("Type")),
        compile_type: CompileType::from(element.attr("CompileType")),
    }
}

fn irdb_from(element: &Element) -> Irdb {
    Irdb {
        db_key: element.attr("DBKey").to_string(),
        property: element.child_text("Property").to_string(),
        dos_name: element.child_text("DOSName").to_string(),
        user_db_path_name: element.child_text("UserDBPathName").to_string(),
        notes: element.child_text("Notes").to_string(),
    }
}
