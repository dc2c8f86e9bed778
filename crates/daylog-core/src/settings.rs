//! User settings: service credentials, commit-source selection, and the
//! keyword mapping table.
//!
//! Stored as TOML under the user config directory. The query engine only
//! reads these values; writes happen through the `config` and `map` CLI
//! commands.

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::mapper::MappingTable;
use crate::records::SourceService;

/// Which services a commit query consults. Work-item queries always go to
/// the work-tracking service and ignore this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitsSource {
    Github,
    Devops,
    #[default]
    Both,
}

impl CommitsSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Devops => "devops",
            Self::Both => "both",
        }
    }
}

impl FromStr for CommitsSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "github" => Ok(Self::Github),
            "devops" => Ok(Self::Devops),
            "both" => Ok(Self::Both),
            other => Err(format!(
                "unknown commits source '{other}', expected github, devops, or both"
            )),
        }
    }
}

/// GitHub credentials. All three fields are required for the service to
/// count as enabled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubSettings {
    pub token: String,
    /// Author login used to filter commits server-side.
    pub username: String,
    pub organization: String,
    /// Override for GitHub Enterprise installations.
    pub api_base: Option<String>,
}

impl GithubSettings {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.token.is_empty() && !self.username.is_empty() && !self.organization.is_empty()
    }
}

/// Azure DevOps credentials. Token and organization are required; the
/// identity is implied by the token (`@Me` in queries).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DevopsSettings {
    pub token: String,
    pub organization: String,
    /// Override for Azure DevOps Server installations.
    pub api_base: Option<String>,
}

impl DevopsSettings {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.token.is_empty() && !self.organization.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub commits_source: CommitsSource,
    pub github: GithubSettings,
    pub devops: DevopsSettings,
    pub mappings: MappingTable,
}

impl Settings {
    /// Services that will actually run for a commit query: the selection
    /// intersected with the services whose credentials are complete.
    #[must_use]
    pub fn enabled_sources(&self) -> Vec<SourceService> {
        let mut sources = Vec::new();
        if matches!(
            self.commits_source,
            CommitsSource::Github | CommitsSource::Both
        ) && self.github.is_configured()
        {
            sources.push(SourceService::Github);
        }
        if matches!(
            self.commits_source,
            CommitsSource::Devops | CommitsSource::Both
        ) && self.devops.is_configured()
        {
            sources.push(SourceService::Devops);
        }
        sources
    }

    /// Path of the settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the user config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf> {
        let mut path =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Failed to get config dir"))?;
        path.push("daylog");
        path.push("config.toml");
        Ok(path)
    }

    /// Load settings from disk. A missing file yields the defaults, i.e.
    /// nothing configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Write settings back to disk, creating the parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let raw = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(&path, raw).with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> Settings {
        toml::from_str(
            r#"
            commits_source = "both"

            [github]
            token = "ghp_x"
            username = "dev"
            organization = "acme"

            [devops]
            token = "pat_x"
            organization = "acme-org"

            [mappings]
            checkout = ["TCK-1", "TCK-2"]
            "#,
        )
        .unwrap()
    }

    #[test]
    fn parses_full_settings_file() {
        let settings = configured();
        assert!(settings.github.is_configured());
        assert!(settings.devops.is_configured());
        assert_eq!(settings.mappings["checkout"], vec!["TCK-1", "TCK-2"]);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.commits_source, CommitsSource::Both);
        assert!(!settings.github.is_configured());
        assert!(settings.enabled_sources().is_empty());
    }

    #[test]
    fn enabled_sources_requires_complete_credentials() {
        let mut settings = configured();
        settings.github.username.clear();
        assert_eq!(settings.enabled_sources(), vec![SourceService::Devops]);
    }

    #[test]
    fn enabled_sources_respects_selection() {
        let mut settings = configured();
        settings.commits_source = CommitsSource::Github;
        assert_eq!(settings.enabled_sources(), vec![SourceService::Github]);

        settings.commits_source = CommitsSource::Both;
        assert_eq!(
            settings.enabled_sources(),
            vec![SourceService::Github, SourceService::Devops]
        );
    }

    #[test]
    fn commits_source_parses_known_values() {
        assert_eq!("github".parse::<CommitsSource>(), Ok(CommitsSource::Github));
        assert_eq!("both".parse::<CommitsSource>(), Ok(CommitsSource::Both));
        assert!("jira".parse::<CommitsSource>().is_err());
    }

    #[test]
    fn settings_roundtrip_through_toml() {
        let settings = configured();
        let raw = toml::to_string_pretty(&settings).unwrap();
        let back: Settings = toml::from_str(&raw).unwrap();
        assert_eq!(back.enabled_sources(), settings.enabled_sources());
        assert_eq!(back.mappings, settings.mappings);
    }
}
