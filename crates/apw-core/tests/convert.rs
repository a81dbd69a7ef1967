//! Profile conversion and path rewriting over whole workspaces.

use std::path::Path;

use apw_core::{convert_workspace, set_absolute_filepaths, set_relative_filepaths};
use apw_model::{
    CUSTOM_DEVICE_ADDRESS, CompileType, DeviceMap, File, FileType, Profile, Project, System,
    Workspace,
};
use proptest::prelude::*;

fn p1_workspace() -> Workspace {
    let mut system = System::new("Main", 1);
    system.add_file(File::new("src/main.axs", FileType::Source, CompileType::Netlinx));
    system.add_file(File::new("mod/helper.axs", FileType::Module, CompileType::Netlinx));
    let mut project = Project::new("P1");
    project.add_system(system);
    let mut workspace = Workspace::new("Site");
    workspace.add_project(project);
    workspace
}

fn only_system(workspace: &Workspace) -> &System {
    let systems: Vec<&System> = workspace.systems().collect();
    assert_eq!(systems.len(), 1);
    systems[0]
}

#[test]
fn release_keeps_compiled_main_program_only() {
    let mut workspace = p1_workspace();
    let summary = convert_workspace(&mut workspace, Profile::Release);
    assert_eq!((summary.kept, summary.replaced, summary.dropped), (0, 1, 1));

    let system = only_system(&workspace);
    assert_eq!(system.files.len(), 1);
    let main = &system.files[0];
    assert_eq!(main.file_name(), "main.tkn");
    assert_eq!(main.file_type, FileType::Source);
    assert_eq!(main.device_maps, vec![DeviceMap::custom()]);
    assert_eq!(main.device_maps[0].dev_addr, CUSTOM_DEVICE_ADDRESS);
}

#[test]
fn handover_compiles_modules_and_keeps_sources() {
    let mut workspace = p1_workspace();
    let summary = convert_workspace(&mut workspace, Profile::Handover);
    assert_eq!((summary.kept, summary.replaced, summary.dropped), (1, 1, 0));

    let system = only_system(&workspace);
    let names: Vec<&str> = system.files.iter().map(File::file_name).collect();
    assert_eq!(names, vec!["main.axs", "helper.tko"]);
    assert_eq!(system.files[0], p1_workspace().systems().next().unwrap().files[0]);
    assert!(system.files[1].device_maps.is_empty());
}

#[test]
fn release_drops_includes_in_every_system() {
    let mut workspace = Workspace::new("Site");
    for (project_id, system_name) in [("P2", "Lobby"), ("P1", "Boardroom")] {
        let mut system = System::new(system_name, 1);
        system.add_file(File::new("inc/lib.axi", FileType::Include, CompileType::Netlinx));
        system.add_file(File::new("ir/tv.irl", FileType::Ir, CompileType::None));
        let mut project = Project::new(project_id);
        project.add_system(system);
        workspace.add_project(project);
    }

    convert_workspace(&mut workspace, Profile::Release);
    for system in workspace.systems() {
        let names: Vec<&str> = system.files.iter().map(File::file_name).collect();
        assert_eq!(names, vec!["tv.irl"]);
    }
}

#[test]
fn relative_then_absolute_paths_land_in_type_folders() {
    let mut workspace = p1_workspace();
    convert_workspace(&mut workspace, Profile::Handover);
    set_relative_filepaths(&mut workspace);
    set_absolute_filepaths(&mut workspace, Path::new("/out"));

    let paths: Vec<&str> = only_system(&workspace)
        .files
        .iter()
        .map(|f| f.file_path_name.as_str())
        .collect();
    assert_eq!(paths, vec!["/out/Source/main.axs", "/out/Modules/helper.tko"]);
}

fn path_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,8}(/[a-z]{1,8}){0,2}\\.(axs|axi|irl|tp4)",
        "/[a-z]{1,8}/[a-z]{1,8}\\.(axs|axi)",
    ]
}

fn file_type_strategy() -> impl Strategy<Value = FileType> {
    prop_oneof![
        Just(FileType::Source),
        Just(FileType::MasterSrc),
        Just(FileType::Module),
        Just(FileType::Include),
        Just(FileType::Ir),
        Just(FileType::Other),
    ]
}

fn workspace_strategy() -> impl Strategy<Value = Workspace> {
    prop::collection::vec((path_strategy(), file_type_strategy()), 0..8).prop_map(|files| {
        let mut system = System::new("Main", 1);
        for (path, file_type) in files {
            system.add_file(File::new(path, file_type, CompileType::Netlinx));
        }
        let mut project = Project::new("P1");
        project.add_system(system);
        let mut workspace = Workspace::new("Site");
        workspace.add_project(project);
        workspace
    })
}

proptest! {
    #[test]
    fn set_absolute_filepaths_is_idempotent(mut workspace in workspace_strategy()) {
        let base = Path::new("/base/dir");
        set_absolute_filepaths(&mut workspace, base);
        let once = workspace.clone();
        set_absolute_filepaths(&mut workspace, base);
        prop_assert_eq!(workspace, once);
    }

    #[test]
    fn module_sources_vanish_on_release_and_compile_on_handover(name in "[a-z]{1,8}") {
        let path = format!("mod/{name}.axs");
        let mut system = System::new("Main", 1);
        system.add_file(File::new(path, FileType::Module, CompileType::Netlinx));
        let mut project = Project::new("P1");
        project.add_system(system);
        let mut workspace = Workspace::new("Site");
        workspace.add_project(project);

        let mut release = workspace.clone();
        convert_workspace(&mut release, Profile::Release);
        prop_assert!(release.systems().all(|s| s.files.is_empty()));

        convert_workspace(&mut workspace, Profile::Handover);
        let files: Vec<&File> = workspace.systems().flat_map(|s| s.files.iter()).collect();
        prop_assert_eq!(files.len(), 1);
        prop_assert_eq!(files[0].file_path_name.clone(), format!("mod/{name}.tko"));
    }

    #[test]
    fn release_main_programs_get_exactly_one_device_map(
        mut workspace in workspace_strategy()
    ) {
        convert_workspace(&mut workspace, Profile::Release);
        for file in workspace.systems().flat_map(|s| s.files.iter()) {
            if file.file_type.is_source() && file.extension() == ".tkn" {
                prop_assert_eq!(file.device_maps.len(), 1);
            }
            prop_assert!(file.extension() != ".axi" || file.file_type != FileType::Include);
        }
    }
}
