//! Client settings

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::auth::LoginRoutes;

const DEFAULT_API_BASE: &str = "http://localhost:3001/api";
const API_BASE_ENV: &str = "QBANK_API_BASE";

/// Application settings, read from `config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// REST API root, e.g. `https://qbank.example.com/api`
    pub api_base: String,
    /// Where a completed login lands
    pub home_route: String,
    /// Login entry point
    pub login_route: String,
}

impl Default for Settings {
    fn default() -> Self {
        let routes = LoginRoutes::default();
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            home_route: routes.home,
            login_route: routes.login,
        }
    }
}

impl Settings {
    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "qbank-cli", "qbank-cli")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Load settings from the default location, then apply env overrides.
    pub fn load() -> Result<Self> {
        let mut settings = Self::load_from(&Self::config_path()?)?;
        if let Ok(api_base) = std::env::var(API_BASE_ENV) {
            tracing::debug!("{} overrides api_base", API_BASE_ENV);
            settings.api_base = api_base;
        }
        Ok(settings.normalized())
    }

    /// Load settings from `path`; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let settings: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(settings.normalized())
    }

    pub fn routes(&self) -> LoginRoutes {
        LoginRoutes {
            home: self.home_route.clone(),
            login: self.login_route.clone(),
        }
    }

    fn normalized(mut self) -> Self {
        let trimmed = self.api_base.trim_end_matches('/').len();
        self.api_base.truncate(trimmed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.routes(), LoginRoutes::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_base = \"https://qbank.example.com/api/\"\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.api_base, "https://qbank.example.com/api");
        assert_eq!(settings.home_route, "/dashboard");
        assert_eq!(settings.login_route, "/login");
    }

    #[test]
    fn test_bad_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_base = 42\n").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }
}
