use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use validator::Validate;

/// Settings file looked up at the repository root
pub const SETTINGS_FILE_NAME: &str = ".assetgit.yml";

/// Configuration store related errors
#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("Configuration file not found at path: {0}")]
    ConfigFileNotFound(String),

    #[error("Configuration file already exists: {0}")]
    AlreadyExists(String),

    #[error("Configuration file read failed: {0}")]
    ReadFailed(String),

    #[error("Configuration file write failed: {0}")]
    WriteFailed(String),

    #[error("YAML parsing failed: {0}")]
    YamlParsingFailed(String),

    #[error("YAML serialization failed: {0}")]
    YamlSerializationFailed(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// assetgit settings (`.assetgit.yml`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Settings {
    /// Path or name of the git executable
    #[validate(length(min = 1))]
    pub git_binary: String,

    /// Remote the Sync operation compares against and pulls from
    #[validate(length(min = 1, max = 255))]
    pub remote: String,

    /// Content directory, relative to the repository root
    #[validate(length(min = 1))]
    pub content_dir: String,

    /// Package name prefix mapped onto the content directory
    #[validate(length(min = 2))]
    pub package_root: String,

    /// Extensions of files that back loadable packages
    #[validate(length(min = 1))]
    pub asset_extensions: Vec<String>,

    /// Message recorded on the stash created before a Sync
    #[validate(length(min = 1))]
    pub stash_message: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            git_binary: "git".to_string(),
            remote: "origin".to_string(),
            content_dir: "Content".to_string(),
            package_root: "/Game".to_string(),
            asset_extensions: vec![".uasset".to_string(), ".umap".to_string()],
            stash_message: "Stashed by assetgit".to_string(),
        }
    }
}

/// Configuration store for the YAML settings file
#[derive(Debug, Default)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Path of the settings file for a repository root
    pub fn settings_path(repository_root: &Path) -> PathBuf {
        repository_root.join(SETTINGS_FILE_NAME)
    }

    /// Load settings for a repository, falling back to defaults when no file exists
    pub fn load(&self, repository_root: &Path) -> Result<Settings, ConfigStoreError> {
        let path = Self::settings_path(repository_root);
        if !path.exists() {
            debug!("No {} found, using default settings", SETTINGS_FILE_NAME);
            return Ok(Settings::default());
        }
        self.read_settings(&path)
    }

    /// Read and validate settings from a YAML file
    pub fn read_settings<P: AsRef<Path>>(&self, config_path: P) -> Result<Settings, ConfigStoreError> {
        let config_path = config_path.as_ref();

        if !config_path.exists() {
            return Err(ConfigStoreError::ConfigFileNotFound(
                config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(config_path)
            .map_err(|e| ConfigStoreError::ReadFailed(e.to_string()))?;

        let settings: Settings = serde_yaml::from_str(&contents)
            .map_err(|e| ConfigStoreError::YamlParsingFailed(e.to_string()))?;

        self.validate_settings(&settings)?;
        Ok(settings)
    }

    /// Write settings to a YAML file
    pub fn write_settings<P: AsRef<Path>>(
        &self,
        config_path: P,
        settings: &Settings,
        overwrite: bool,
    ) -> Result<(), ConfigStoreError> {
        let config_path = config_path.as_ref();

        if config_path.exists() && !overwrite {
            return Err(ConfigStoreError::AlreadyExists(
                config_path.display().to_string(),
            ));
        }

        self.validate_settings(settings)?;

        let yaml_content = serde_yaml::to_string(settings)
            .map_err(|e| ConfigStoreError::YamlSerializationFailed(e.to_string()))?;

        fs::write(config_path, yaml_content)
            .map_err(|e| ConfigStoreError::WriteFailed(e.to_string()))?;

        Ok(())
    }

    /// Validate settings
    pub fn validate_settings(&self, settings: &Settings) -> Result<(), ConfigStoreError> {
        settings
            .validate()
            .map_err(|e| ConfigStoreError::ValidationFailed(e.to_string()))?;

        if !settings.package_root.starts_with('/') {
            return Err(ConfigStoreError::ValidationFailed(format!(
                "package_root must start with '/': {}",
                settings.package_root
            )));
        }

        if Path::new(&settings.content_dir).is_absolute() {
            return Err(ConfigStoreError::ValidationFailed(format!(
                "content_dir must be relative to the repository root: {}",
                settings.content_dir
            )));
        }

        Ok(())
    }
}
