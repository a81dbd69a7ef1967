//! End-to-end packaging against a workspace laid out on disk.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Local, Timelike};

use apw_core::{
    FileSet, PackError, PackageOptions, WorkspaceFile, assemble, find_workspaces, load_workspaces,
    package,
};
use apw_model::{CompileType, File, FileType, Profile, Project, System, Workspace};
use tempfile::TempDir;

struct Site {
    dir: TempDir,
    descriptor: PathBuf,
}

impl Site {
    fn root(&self) -> &Path {
        self.dir.path()
    }
}

fn touch(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn site_workspace() -> Workspace {
    let mut main = System::new("Main", 1);
    main.add_file(File::new("src/main.axs", FileType::Source, CompileType::Netlinx));
    main.add_file(File::new("mod/helper.axs", FileType::Module, CompileType::Netlinx));
    main.add_file(File::new(r"inc\lib.axi", FileType::Include, CompileType::Netlinx));
    let mut p1 = Project::new("P1");
    p1.add_system(main);

    let mut lobby = System::new("Lobby", 2);
    lobby.add_file(File::new("ui/lobby.TP4", FileType::Tp4, CompileType::None));
    let mut p2 = Project::new("P2");
    p2.add_system(lobby);

    let mut workspace = Workspace::new("Site");
    workspace.add_project(p1);
    workspace.add_project(p2);
    workspace
}

fn site() -> Site {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(&root.join("src/main.axs"), "PROGRAM_NAME='main'");
    touch(&root.join("src/main.tkn"), "compiled main");
    touch(&root.join("mod/helper.axs"), "MODULE_NAME='helper'");
    touch(&root.join("mod/helper.tko"), "compiled helper");
    touch(&root.join("inc/lib.axi"), "PROGRAM_NAME='lib'");
    touch(&root.join("ui/lobby.TP4"), "panel");

    let descriptor = root.join("Site.apw");
    apw_xml::write_workspace(&descriptor, &mut site_workspace()).unwrap();
    Site { dir, descriptor }
}

fn options(profile: Profile) -> PackageOptions {
    PackageOptions {
        profile,
        build_tag: Some("T1".to_string()),
        ..PackageOptions::default()
    }
}

fn entries(archive: &Path) -> Vec<String> {
    let mut zip = zip::ZipArchive::new(fs::File::open(archive).unwrap()).unwrap();
    (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect()
}

fn archived_workspace(archive: &Path, name: &str) -> Workspace {
    let mut zip = zip::ZipArchive::new(fs::File::open(archive).unwrap()).unwrap();
    let mut bytes = Vec::new();
    zip.by_name(name).unwrap().read_to_end(&mut bytes).unwrap();
    apw_xml::decode(&bytes).unwrap()
}

#[test]
fn release_package_contains_compiled_programs() {
    let site = site();
    let source = WorkspaceFile::load(&site.descriptor).unwrap();
    let outcome = package(&source, &options(Profile::Release)).unwrap();

    assert_eq!(outcome.archive, site.root().join("PackUp").join("Site_T1.zip"));
    assert_eq!(outcome.build_tag, "T1");
    assert_eq!(outcome.file_count, 2);
    assert_eq!(outcome.conversion.dropped, 2);
    assert_eq!(
        entries(&outcome.archive),
        vec!["Source/main.tkn", "Interfaces/lobby.TP4", "Site.apw"]
    );

    let packed = archived_workspace(&outcome.archive, "Site.apw");
    assert_eq!(packed.current_version, "4.0");
    let paths: Vec<String> = packed
        .systems()
        .flat_map(|s| s.files.iter().map(|f| f.file_path_name.clone()))
        .collect();
    assert_eq!(
        paths,
        vec![
            Path::new("Source").join("main.tkn").to_string_lossy().into_owned(),
            Path::new("Interfaces").join("lobby.TP4").to_string_lossy().into_owned(),
        ]
    );

    // The loaded workspace is not modified by packaging.
    assert_eq!(source, WorkspaceFile::load(&site.descriptor).unwrap());
}

#[test]
fn handover_package_for_one_project() {
    let site = site();
    let source = WorkspaceFile::load(&site.descriptor).unwrap();
    let outcome = package(
        &source,
        &PackageOptions {
            project: Some("P1".to_string()),
            ..options(Profile::Handover)
        },
    )
    .unwrap();

    assert_eq!(
        entries(&outcome.archive),
        vec![
            "Includes/lib.axi",
            "Modules/helper.tko",
            "Source/main.axs",
            "Site.apw"
        ]
    );
    let packed = archived_workspace(&outcome.archive, "Site.apw");
    assert_eq!(packed.projects().len(), 1);
    assert_eq!(packed.projects()[0].identifier(), "P1");
}

#[test]
fn package_with_missing_compiled_file_creates_nothing() {
    let site = site();
    fs::remove_file(site.root().join("src/main.tkn")).unwrap();
    let source = WorkspaceFile::load(&site.descriptor).unwrap();

    let err = package(&source, &options(Profile::Release)).unwrap_err();
    match &err {
        PackError::MissingFiles { missing } => {
            assert_eq!(missing, &vec![site.root().join("src/main.tkn")]);
        }
        other => panic!("expected missing files, got {other:?}"),
    }
    assert_eq!(err.to_string(), "1 file not found");
    assert!(!site.root().join("PackUp").exists());
}

#[test]
fn package_rejects_unknown_project_and_system() {
    let site = site();
    let source = WorkspaceFile::load(&site.descriptor).unwrap();

    let err = package(
        &source,
        &PackageOptions {
            project: Some("P9".to_string()),
            ..options(Profile::Source)
        },
    )
    .unwrap_err();
    assert!(matches!(err, PackError::ProjectNotFound { ref identifier } if identifier == "P9"));

    let err = package(
        &source,
        &PackageOptions {
            system: Some("009: Nowhere".to_string()),
            ..options(Profile::Source)
        },
    )
    .unwrap_err();
    assert!(matches!(err, PackError::SystemNotFound { .. }));
}

#[test]
fn assemble_refuses_when_files_disappear() {
    let site = site();
    let mut workspace = site_workspace();
    let files = FileSet::collect(&workspace, site.root());
    assert!(files.is_complete());

    fs::remove_file(site.root().join("ui/lobby.TP4")).unwrap();
    fs::remove_file(site.root().join("inc/lib.axi")).unwrap();
    let out = site.root().join("out");
    let err = assemble(&mut workspace, "Site", &files, &out, None).unwrap_err();

    assert_eq!(err.to_string(), "2 files not found");
    assert!(!out.join("Site.zip").exists());
}

#[test]
fn export_archive_uses_descriptor_stem() {
    let site = site();
    let source = WorkspaceFile::load(&site.descriptor).unwrap();
    let out = site.root().join("exports");
    let archive = source.export_archive(&out, None).unwrap();

    assert_eq!(archive, out.join("Site.zip"));
    let names = entries(&archive);
    assert_eq!(names.len(), 5);
    assert_eq!(names.last().map(String::as_str), Some("Site.apw"));
}

#[test]
fn system_narrowing_drops_emptied_projects() {
    let site = site();
    let source = WorkspaceFile::load(&site.descriptor).unwrap();
    let outcome = package(
        &source,
        &PackageOptions {
            system: Some("002: Lobby".to_string()),
            ..options(Profile::Source)
        },
    )
    .unwrap();

    assert_eq!(entries(&outcome.archive), vec!["Interfaces/lobby.TP4", "Site.apw"]);
    let packed = archived_workspace(&outcome.archive, "Site.apw");
    let projects: Vec<&str> = packed.projects().iter().map(Project::identifier).collect();
    assert_eq!(projects, vec!["P2"]);
}

#[test]
fn archive_entries_are_deflated_with_file_metadata() {
    let site = site();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(
            site.root().join("src/main.axs"),
            fs::Permissions::from_mode(0o640),
        )
        .unwrap();
    }
    let source = WorkspaceFile::load(&site.descriptor).unwrap();
    let outcome = package(&source, &options(Profile::Source)).unwrap();

    let mtime: DateTime<Local> = fs::metadata(site.root().join("src/main.axs"))
        .unwrap()
        .modified()
        .unwrap()
        .into();

    let mut zip = zip::ZipArchive::new(fs::File::open(&outcome.archive).unwrap()).unwrap();
    for i in 0..zip.len() {
        let entry = zip.by_index(i).unwrap();
        assert_eq!(entry.compression(), zip::CompressionMethod::Deflated, "{}", entry.name());
        if entry.name() == "Source/main.axs" {
            let stamp = entry.last_modified().unwrap();
            assert_eq!(
                (stamp.year(), stamp.month(), stamp.day(), stamp.hour(), stamp.minute()),
                (
                    mtime.year() as u16,
                    mtime.month() as u8,
                    mtime.day() as u8,
                    mtime.hour() as u8,
                    mtime.minute() as u8
                )
            );
        }
    }

    #[cfg(unix)]
    {
        let entry = zip.by_name("Source/main.axs").unwrap();
        assert_eq!(entry.unix_mode().map(|mode| mode & 0o777), Some(0o640));
    }
}

#[test]
fn equivalent_path_spellings_pack_once() {
    let site = site();
    let mut workspace = site_workspace();
    let main = workspace.find_project_mut("P1").unwrap().find_system_mut("001: Main").unwrap();
    main.add_file(File::new("mod/../src/./main.axs", FileType::Source, CompileType::Netlinx));
    apw_xml::write_workspace(&site.descriptor, &mut workspace).unwrap();

    let source = WorkspaceFile::load(&site.descriptor).unwrap();
    let files = source.file_set();
    assert_eq!(files.collisions().len(), 1);

    let outcome = package(&source, &options(Profile::Source)).unwrap();
    let names = entries(&outcome.archive);
    assert_eq!(names.iter().filter(|name| *name == "Source/main.axs").count(), 1);
}

#[test]
fn save_writes_back_to_descriptor() {
    let site = site();
    let mut source = WorkspaceFile::load(&site.descriptor).unwrap();
    source.workspace.comments = "Handed over".to_string();
    source.save().unwrap();

    let reloaded = WorkspaceFile::load(&site.descriptor).unwrap();
    assert_eq!(reloaded.workspace.comments, "Handed over");
    assert_eq!(reloaded, source);
}

#[test]
fn discovery_finds_descriptors() {
    let site = site();
    touch(&site.root().join("nested/deeper/Other.apw"), "<Workspace></Workspace>");
    touch(&site.root().join("nested/Broken.apw"), "<Workspace>");
    touch(&site.root().join("nested/readme.txt"), "");

    let shallow = find_workspaces(site.root(), false).unwrap();
    assert_eq!(shallow, vec![site.descriptor.clone()]);

    let deep = find_workspaces(site.root(), true).unwrap();
    assert_eq!(
        deep,
        vec![
            site.descriptor.clone(),
            site.root().join("nested/Broken.apw"),
            site.root().join("nested/deeper/Other.apw"),
        ]
    );

    let loaded = load_workspaces(site.root(), true).unwrap();
    let identifiers: Vec<&str> = loaded.iter().map(WorkspaceFile::identifier).collect();
    assert_eq!(identifiers, vec!["Site", "Other"]);
}
