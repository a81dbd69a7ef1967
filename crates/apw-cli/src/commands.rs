use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use tracing::{info, info_span};

use apw_core::{
    PackageOptions, PackageOutcome, WorkspaceFile, build_id, convert_workspace, find_workspaces,
    load_workspaces, package,
};
use apw_model::Profile;

use apw_cli::config::PackupConfig;

use crate::cli::{CheckArgs, ConvertArgs, ListArgs, PackArgs};
use crate::summary::{print_file_check, print_pack_summary, print_workspace_list};

pub fn run_pack(args: &PackArgs, config: &PackupConfig) -> Result<()> {
    let root = config.repo_root(args.path.as_deref());
    let descriptor = select_workspace(&root, args.workspace.as_deref())?;
    let source = WorkspaceFile::load(&descriptor)
        .with_context(|| format!("load workspace {}", descriptor.display()))?;

    let span = info_span!("pack", workspace = %source.identifier());
    let _guard = span.enter();

    let base_tag = args
        .build_tag
        .clone()
        .unwrap_or_else(|| build_id(Utc::now()));
    let output_dir = source.origin().join(&config.output_folder);

    let mut outcomes: Vec<PackageOutcome> = Vec::new();
    for profile in args.profiles() {
        let options = PackageOptions {
            profile,
            project: args.project.clone(),
            system: args.system.clone(),
            output_dir: Some(output_dir.clone()),
            build_tag: Some(format!("{base_tag}{}", profile.build_suffix())),
        };
        let outcome = package(&source, &options)
            .with_context(|| format!("pack {profile} package of {}", source.identifier()))?;
        outcomes.push(outcome);
    }
    print_pack_summary(&source, &outcomes);
    Ok(())
}

/// Returns whether every referenced file exists.
pub fn run_check(args: &CheckArgs) -> Result<bool> {
    let source = WorkspaceFile::load(&args.workspace)
        .with_context(|| format!("load workspace {}", args.workspace.display()))?;
    let files = source.file_set();
    print_file_check(&source, &files);
    Ok(files.is_complete())
}

pub fn run_convert(args: &ConvertArgs) -> Result<()> {
    let mut source = WorkspaceFile::load(&args.workspace)
        .with_context(|| format!("load workspace {}", args.workspace.display()))?;
    let profile = Profile::from(args.profile);
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_convert_output(&source, profile));

    let summary = convert_workspace(&mut source.workspace, profile);
    source
        .save_as(&output)
        .with_context(|| format!("write workspace {}", output.display()))?;
    info!(output = %output.display(), "saved converted workspace");
    println!(
        "{}: {} kept, {} converted, {} dropped",
        output.display(),
        summary.kept,
        summary.replaced,
        summary.dropped
    );
    Ok(())
}

pub fn run_list(args: &ListArgs, config: &PackupConfig) -> Result<()> {
    let root = config.repo_root(args.dir.as_deref());
    let workspaces = load_workspaces(&root, args.recursive)
        .with_context(|| format!("search {}", root.display()))?;
    if workspaces.is_empty() {
        println!("No workspaces found in {}", root.display());
        return Ok(());
    }
    print_workspace_list(&workspaces);
    Ok(())
}

fn default_convert_output(source: &WorkspaceFile, profile: Profile) -> PathBuf {
    source
        .origin()
        .join(format!("{}_{profile}.apw", source.identifier()))
}

/// Picks the descriptor to pack from everything under `root`.
///
/// Without a name there must be exactly one candidate.
fn select_workspace(root: &Path, name: Option<&str>) -> Result<PathBuf> {
    let candidates = find_workspaces(root, true)
        .with_context(|| format!("search {}", root.display()))?;
    if candidates.is_empty() {
        bail!("no workspaces found in {}", root.display());
    }

    if let Some(name) = name {
        return candidates
            .iter()
            .find(|path| workspace_name(path) == name)
            .cloned()
            .ok_or_else(|| {
                anyhow!(
                    "workspace {name:?} not found; candidates: {}",
                    candidate_list(&candidates)
                )
            });
    }

    match candidates.as_slice() {
        [only] => Ok(only.clone()),
        _ => bail!(
            "several workspaces found, choose one with --workspace: {}",
            candidate_list(&candidates)
        ),
    }
}

fn workspace_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn candidate_list(candidates: &[PathBuf]) -> String {
    candidates
        .iter()
        .map(|path| workspace_name(path))
        .collect::<Vec<_>>()
        .join(", ")
}
