//! `packup.json` settings.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

use apw_core::DEFAULT_OUTPUT_FOLDER;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "packup.json";

static USER_PROFILE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)%userprofile%").expect("user profile pattern is valid"));

/// Settings read from `packup.json`. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackupConfig {
    /// Directory searched for workspaces.
    pub repo_root_path: String,
    /// Folder, relative to each workspace, that packages are written to.
    pub output_folder: String,
}

impl Default for PackupConfig {
    fn default() -> Self {
        Self {
            repo_root_path: String::new(),
            output_folder: DEFAULT_OUTPUT_FOLDER.to_string(),
        }
    }
}

impl PackupConfig {
    /// Parses config text and expands `%USERPROFILE%` in the repository root.
    pub fn parse(text: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(text).context("parse config")?;
        config.repo_root_path = expand_user_profile(&config.repo_root_path, &user_profile());
        Ok(config)
    }

    /// Loads `path`, or `packup.json` in the working directory.
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if !required && !path.is_file() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("load config {}", path.display()))
    }

    /// Directory to search for workspaces; `override_path` wins when given.
    pub fn repo_root(&self, override_path: Option<&Path>) -> PathBuf {
        match override_path {
            Some(path) => path.to_path_buf(),
            None if self.repo_root_path.is_empty() => PathBuf::from("."),
            None => PathBuf::from(&self.repo_root_path),
        }
    }
}

/// Replaces every `%USERPROFILE%` token, in any letter case, with `profile`.
pub fn expand_user_profile(value: &str, profile: &str) -> String {
    USER_PROFILE_TOKEN
        .replace_all(value, NoExpand(profile))
        .into_owned()
}

fn user_profile() -> String {
    std::env::var("USERPROFILE")
        .or_else(|_| std::env::var("HOME"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_user_profile_ignores_case() {
        assert_eq!(
            expand_user_profile(r"%UserProfile%\Repos", r"C:\Users\amx"),
            r"C:\Users\amx\Repos"
        );
        assert_eq!(
            expand_user_profile("%userprofile%/a/%USERPROFILE%", "/home/x"),
            "/home/x/a//home/x"
        );
        assert_eq!(expand_user_profile("/srv/jobs", "/home/x"), "/srv/jobs");
    }

    #[test]
    fn test_expand_user_profile_keeps_dollar_signs() {
        assert_eq!(expand_user_profile("%USERPROFILE%", "$HOME"), "$HOME");
    }

    #[test]
    fn test_repo_root_precedence() {
        let config = PackupConfig {
            repo_root_path: "/srv/jobs".to_string(),
            ..PackupConfig::default()
        };
        assert_eq!(config.repo_root(None), PathBuf::from("/srv/jobs"));
        assert_eq!(
            config.repo_root(Some(Path::new("/tmp/other"))),
            PathBuf::from("/tmp/other")
        );
        assert_eq!(PackupConfig::default().repo_root(None), PathBuf::from("."));
    }
}
