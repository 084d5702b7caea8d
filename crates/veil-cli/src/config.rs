use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use veil_core::container::{DEFAULT_GLYPH, DEFAULT_PHRASE, DEFAULT_ROLE};
use veil_core::crypto::DEFAULT_MIN_PASSPHRASE_LENGTH;

use crate::constants::CONFIG_ENV;

/// Contents of `config.toml`. Every section and key is optional on disk.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VeilConfig {
    #[serde(default)]
    pub create: CreateSection,
    #[serde(default)]
    pub security: SecuritySection,
    #[serde(default)]
    pub ui: UiSection,
}

/// Defaults for `veil create`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateSection {
    pub glyph: Option<String>,
    pub phrase: Option<String>,
    pub roles: Option<Vec<String>>,
    /// Directory for packages when `--out` is not given
    pub output_dir: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySection {
    pub min_passphrase_length: usize,
    /// Compare checksums before every reveal
    pub verify_integrity: bool,
}

impl Default for SecuritySection {
    fn default() -> Self {
        Self {
            min_passphrase_length: DEFAULT_MIN_PASSPHRASE_LENGTH,
            verify_integrity: true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSection {
    pub color: bool,
    pub ascii: bool,
}

impl Default for UiSection {
    fn default() -> Self {
        Self {
            color: true,
            ascii: false,
        }
    }
}

impl VeilConfig {
    /// The config `veil init` writes: defaults spelled out so they are easy to edit.
    pub fn starter() -> Self {
        Self {
            create: CreateSection {
                glyph: Some(DEFAULT_GLYPH.to_string()),
                phrase: Some(DEFAULT_PHRASE.to_string()),
                roles: Some(vec![DEFAULT_ROLE.to_string()]),
                output_dir: None,
            },
            security: SecuritySection::default(),
            ui: UiSection::default(),
        }
    }
}

pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(CONFIG_ENV) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

/// Load the config at `path`, or defaults if the file does not exist.
pub fn load_config(path: &Path) -> anyhow::Result<VeilConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(VeilConfig::default());
    }
    read_config(path)
}

pub fn read_config(path: &Path) -> anyhow::Result<VeilConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &VeilConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("veil"));
        }
    }
    Ok(home_dir()?.join(".config").join("veil"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: VeilConfig = toml::from_str("").unwrap();
        assert_eq!(config.security.min_passphrase_length, 8);
        assert!(config.security.verify_integrity);
        assert!(config.ui.color);
        assert!(!config.ui.ascii);
        assert!(config.create.glyph.is_none());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: VeilConfig = toml::from_str("[security]\nverify_integrity = false\n").unwrap();
        assert!(!config.security.verify_integrity);
        assert_eq!(config.security.min_passphrase_length, 8);
    }

    #[test]
    fn test_starter_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("veil").join("config.toml");

        write_config(&path, &VeilConfig::starter()).unwrap();
        let loaded = read_config(&path).unwrap();

        assert_eq!(loaded.create.glyph.as_deref(), Some(DEFAULT_GLYPH));
        assert_eq!(loaded.create.roles, Some(vec![DEFAULT_ROLE.to_string()]));
        assert!(loaded.create.output_dir.is_none());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert!(config.security.verify_integrity);
    }

    #[test]
    fn test_bad_toml_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[security\n").unwrap();
        assert!(load_config(&path).is_err());
    }
}
