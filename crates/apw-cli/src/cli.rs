//! CLI argument definitions for `packup`.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use apw_model::Profile;

#[derive(Parser)]
#[command(
    name = "packup",
    version,
    about = "Package NetLinx workspaces for archive, handover and release",
    long_about = "Package AMX NetLinx workspaces (.apw) and the files they reference.\n\n\
                  Converts the workspace to the requested profile, checks that every\n\
                  referenced file exists and writes a zip archive with files routed\n\
                  into Source, Includes, IR Files, Interfaces, Modules and Other."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Prefix text log lines with the time.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Settings file (default: ./packup.json when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build archive, handover and/or release packages.
    Pack(PackArgs),

    /// List the files a workspace references and whether they exist.
    Check(CheckArgs),

    /// Convert a workspace descriptor to a profile without packaging.
    Convert(ConvertArgs),

    /// List workspaces in a directory.
    List(ListArgs),
}

#[derive(Parser)]
#[command(group(
    ArgGroup::new("package_type")
        .required(true)
        .multiple(true)
        .args(["archive", "handover", "release"])
))]
pub struct PackArgs {
    /// Produce an archive package (sources as-is).
    #[arg(short = 'A', long = "archive")]
    pub archive: bool,

    /// Produce a handover package (modules compiled).
    #[arg(short = 'H', long = "handover")]
    pub handover: bool,

    /// Produce a release package (compiled programs only).
    #[arg(short = 'R', long = "release")]
    pub release: bool,

    /// Workspace to package, by descriptor name without extension.
    ///
    /// Required when the search directory holds more than one workspace.
    #[arg(long = "workspace", value_name = "NAME")]
    pub workspace: Option<String>,

    /// Package only this project.
    #[arg(long = "project", value_name = "ID")]
    pub project: Option<String>,

    /// Package only this system (e.g. "001: Main").
    #[arg(long = "system", value_name = "ID")]
    pub system: Option<String>,

    /// Directory to search for workspaces (overrides repoRootPath).
    #[arg(long = "path", value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Build tag used in archive names (default: UTC date and seconds of day).
    #[arg(long = "build-tag", value_name = "TAG")]
    pub build_tag: Option<String>,
}

impl PackArgs {
    /// Requested profiles in packing order.
    pub fn profiles(&self) -> Vec<Profile> {
        [
            (self.archive, Profile::Source),
            (self.handover, Profile::Handover),
            (self.release, Profile::Release),
        ]
        .into_iter()
        .filter_map(|(wanted, profile)| wanted.then_some(profile))
        .collect()
    }
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Workspace descriptor.
    #[arg(value_name = "APW")]
    pub workspace: PathBuf,
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// Workspace descriptor.
    #[arg(value_name = "APW")]
    pub workspace: PathBuf,

    /// Target profile.
    #[arg(long = "profile", value_enum)]
    pub profile: ProfileArg,

    /// Output descriptor (default: <APW dir>/<name>_<profile>.apw).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ListArgs {
    /// Directory to search (default: repoRootPath, or the working directory).
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Search subdirectories too.
    #[arg(long = "recursive", short = 'r')]
    pub recursive: bool,
}

/// Profiles selectable on the command line.
#[derive(Clone, Copy, ValueEnum)]
pub enum ProfileArg {
    Source,
    Release,
    Handover,
}

impl From<ProfileArg> for Profile {
    fn from(value: ProfileArg) -> Self {
        match value {
            ProfileArg::Source => Profile::Source,
            ProfileArg::Release => Profile::Release,
            ProfileArg::Handover => Profile::Handover,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_pack_requires_a_package_type() {
        assert!(Cli::try_parse_from(["packup", "pack"]).is_err());

        let cli = Cli::try_parse_from(["packup", "pack", "-R", "-A"]).unwrap();
        let Command::Pack(args) = cli.command else {
            panic!("expected pack");
        };
        assert_eq!(args.profiles(), vec![Profile::Source, Profile::Release]);
    }

    #[test]
    fn test_log_flags_are_global() {
        let cli = Cli::try_parse_from([
            "packup",
            "list",
            "--log-timestamps",
            "--log-format",
            "compact",
            "--log-file",
            "packup.log",
        ])
        .unwrap();
        assert!(cli.log_timestamps);
        assert!(matches!(cli.log_format, LogFormatArg::Compact));
        assert_eq!(cli.log_file, Some(PathBuf::from("packup.log")));

        let cli = Cli::try_parse_from(["packup", "list"]).unwrap();
        assert!(!cli.log_timestamps);
    }

    #[test]
    fn test_convert_parses_profile() {
        let cli =
            Cli::try_parse_from(["packup", "convert", "Site.apw", "--profile", "handover"]).unwrap();
        let Command::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(Profile::from(args.profile), Profile::Handover);
        assert!(args.output.is_none());
    }
}
