use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

/// Key naming the SQLite file that holds the snapshot.
pub const DB_PATH_KEY: &str = "db_path";

/// Flat string map stored as TOML.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    pub map: BTreeMap<String, String>,
}

impl Config {
    /// Default location: `<config dir>/irontrack/config`.
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join("irontrack").join("config"))
            .context("Could not determine config directory")
    }

    /// Reads `path`; a missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let map = toml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(Self { map })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        let content = toml::to_string(&self.map)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to save config to {}", path.display()))
    }

    /// Configured database file, or `<data dir>/irontrack/irontrack.db`.
    pub fn db_path(&self) -> Result<PathBuf> {
        if let Some(p) = self.map.get(DB_PATH_KEY) {
            return Ok(PathBuf::from(p));
        }
        dirs::data_dir()
            .map(|d| d.join("irontrack").join("irontrack.db"))
            .context("Could not determine data directory")
    }
}
