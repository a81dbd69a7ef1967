//! Profile conversion.
//!
//! Each file is classified first, then every system's file list is rebuilt
//! from the classification. Nothing is removed in place.

use serde::Serialize;
use tracing::{debug, info};

use apw_model::{DeviceMap, File, FileType, Profile, System, Workspace};

const EXT_SOURCE: &str = ".axs";
const EXT_INCLUDE: &str = ".axi";
const EXT_TOKEN: &str = "tkn";
const EXT_MODULE_TOKEN: &str = "tko";

/// What conversion does with one file entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileAction {
    /// Emitted unchanged.
    Keep,
    /// Emitted as the given rewritten entry.
    Replace(File),
    /// Not emitted.
    Drop,
}

/// Counts of what a conversion did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConversionSummary {
    pub kept: usize,
    pub replaced: usize,
    pub dropped: usize,
}

impl ConversionSummary {
    fn record(&mut self, action: &FileAction) {
        match action {
            FileAction::Keep => self.kept += 1,
            FileAction::Replace(_) => self.replaced += 1,
            FileAction::Drop => self.dropped += 1,
        }
    }

    fn merge(&mut self, other: ConversionSummary) {
        self.kept += other.kept;
        self.replaced += other.replaced;
        self.dropped += other.dropped;
    }

    pub fn total(&self) -> usize {
        self.kept + self.replaced + self.dropped
    }
}

/// Decides the fate of `file` under `profile`.
pub fn classify(file: &File, profile: Profile) -> FileAction {
    let extension = file.extension();
    let is_source_ext = extension.eq_ignore_ascii_case(EXT_SOURCE);
    let is_include_ext = extension.eq_ignore_ascii_case(EXT_INCLUDE);

    match (profile, &file.file_type) {
        (Profile::Release, file_type) if is_source_ext && file_type.is_source() => {
            let mut compiled = file.clone();
            compiled.change_extension(EXT_TOKEN);
            if compiled.device_maps.is_empty() {
                compiled.add_device_map(DeviceMap::custom());
            }
            FileAction::Replace(compiled)
        }
        (Profile::Release, FileType::Module) if is_source_ext => FileAction::Drop,
        (Profile::Release, FileType::Include) if is_include_ext => FileAction::Drop,
        (Profile::Handover, FileType::Module) if is_source_ext => {
            let mut compiled = file.clone();
            compiled.change_extension(EXT_MODULE_TOKEN);
            FileAction::Replace(compiled)
        }
        _ => FileAction::Keep,
    }
}

/// Rebuilds the file list of one system for `profile`.
pub fn convert_system(system: &mut System, profile: Profile) -> ConversionSummary {
    let mut summary = ConversionSummary::default();
    let files = std::mem::take(&mut system.files);
    system.files = files
        .into_iter()
        .filter_map(|file| {
            let action = classify(&file, profile);
            summary.record(&action);
            match action {
                FileAction::Keep => Some(file),
                FileAction::Replace(converted) => {
                    debug!(
                        from = %file.file_path_name,
                        to = %converted.file_path_name,
                        "converted file"
                    );
                    Some(converted)
                }
                FileAction::Drop => {
                    debug!(path = %file.file_path_name, "dropped file");
                    None
                }
            }
        })
        .collect();
    summary
}

/// Converts every system of every project in place.
///
/// `Source` and `Full` leave the workspace untouched.
pub fn convert_workspace(workspace: &mut Workspace, profile: Profile) -> ConversionSummary {
    let mut summary = ConversionSummary::default();
    for system in workspace.systems_mut() {
        summary.merge(convert_system(system, profile));
    }
    info!(
        profile = %profile,
        kept = summary.kept,
        replaced = summary.replaced,
        dropped = summary.dropped,
        "converted workspace"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use apw_model::{CUSTOM_DEVICE_ADDRESS, CompileType};

    fn file(path: &str, file_type: FileType) -> File {
        File::new(path, file_type, CompileType::Netlinx)
    }

    #[test]
    fn test_release_compiles_main_program() {
        let action = classify(&file("src/main.axs", FileType::MasterSrc), Profile::Release);
        let FileAction::Replace(converted) = action else {
            panic!("expected replacement, got {action:?}");
        };
        assert_eq!(converted.file_path_name, "src/main.tkn");
        assert_eq!(converted.identifier, "main.axs");
        assert_eq!(converted.device_maps.len(), 1);
        assert_eq!(converted.device_maps[0].dev_addr, CUSTOM_DEVICE_ADDRESS);
        assert_eq!(converted.device_maps[0].dev_name, CUSTOM_DEVICE_ADDRESS);
    }

    #[test]
    fn test_release_keeps_existing_device_maps() {
        let mut main = file("main.axs", FileType::Source);
        main.add_device_map(DeviceMap::new("dvTP", "Panel"));
        let FileAction::Replace(converted) = classify(&main, Profile::Release) else {
            panic!("expected replacement");
        };
        assert_eq!(converted.device_maps, vec![DeviceMap::new("dvTP", "Panel")]);
    }

    #[test]
    fn test_release_drops_modules_and_includes() {
        assert_eq!(
            classify(&file("mod/helper.axs", FileType::Module), Profile::Release),
            FileAction::Drop
        );
        assert_eq!(
            classify(&file("inc/lib.AXI", FileType::Include), Profile::Release),
            FileAction::Drop
        );
    }

    #[test]
    fn test_handover_compiles_modules_only() {
        let FileAction::Replace(converted) =
            classify(&file("mod/helper.AXS", FileType::Module), Profile::Handover)
        else {
            panic!("expected replacement");
        };
        assert_eq!(converted.file_path_name, "mod/helper.tko");
        assert!(converted.device_maps.is_empty());

        assert_eq!(
            classify(&file("src/main.axs", FileType::Source), Profile::Handover),
            FileAction::Keep
        );
        assert_eq!(
            classify(&file("inc/lib.axi", FileType::Include), Profile::Handover),
            FileAction::Keep
        );
    }

    #[test]
    fn test_mismatched_type_and_extension_pass_through() {
        assert_eq!(
            classify(&file("mod/helper.tko", FileType::Module), Profile::Release),
            FileAction::Keep
        );
        assert_eq!(
            classify(&file("inc/lib.axs", FileType::Include), Profile::Release),
            FileAction::Keep
        );
        assert_eq!(
            classify(&file("ir/projector.irl", FileType::Ir), Profile::Release),
            FileAction::Keep
        );
    }

    #[test]
    fn test_source_and_full_change_nothing() {
        for profile in [Profile::Source, Profile::Full] {
            for file_type in [FileType::Source, FileType::Module, FileType::Include] {
                assert_eq!(classify(&file("a.axs", file_type.clone()), profile), FileAction::Keep);
                assert_eq!(classify(&file("a.axi", file_type), profile), FileAction::Keep);
            }
        }
    }

    #[test]
    fn test_convert_system_counts_actions() {
        let mut system = System::new("Main", 1);
        system.add_file(file("src/main.axs", FileType::Source));
        system.add_file(file("mod/helper.axs", FileType::Module));
        system.add_file(file("inc/lib.axi", FileType::Include));
        system.add_file(file("ui/panel.TP4", FileType::Tp4));

        let summary = convert_system(&mut system, Profile::Release);
        assert_eq!(
            summary,
            ConversionSummary {
                kept: 1,
                replaced: 1,
                dropped: 2
            }
        );
        assert_eq!(summary.total(), 4);
        let paths: Vec<&str> = system.files.iter().map(|f| f.file_path_name.as_str()).collect();
        assert_eq!(paths, vec!["src/main.tkn", "ui/panel.TP4"]);
    }

    #[test]
    fn test_release_twice_is_stable_for_survivors() {
        let mut system = System::new("Main", 1);
        system.add_file(file("src/main.axs", FileType::Source));
        convert_system(&mut system, Profile::Release);
        let once = system.clone();
        let summary = convert_system(&mut system, Profile::Release);
        assert_eq!(system, once);
        assert_eq!(summary.kept, 1);
    }
}
