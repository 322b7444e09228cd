use std::path::PathBuf;
use thiserror::Error;

use crate::domain::value_objects::package_name::PackageNameError;
use crate::infrastructure::filesystem::config_store::ConfigStoreError;
use crate::infrastructure::scm::git_provider::ProviderError;

#[derive(Error, Debug)]
pub enum AssetGitError {
    #[error("Source control provider error: {message}")]
    ProviderError {
        message: String,
        #[source]
        source: Option<ProviderError>,
    },

    #[error("File system operation failed: {message}")]
    FileSystemError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<ConfigStoreError>,
    },

    #[error("Package error: {message}")]
    PackageError {
        message: String,
        package: Option<String>,
        #[source]
        source: Option<PackageNameError>,
    },
}

impl AssetGitError {
    pub fn provider_error_with_source(message: impl Into<String>, source: ProviderError) -> Self {
        Self::ProviderError {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn filesystem_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    pub fn config_error_with_source(message: impl Into<String>, source: ConfigStoreError) -> Self {
        Self::ConfigError {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn package_error(message: impl Into<String>, package: Option<String>) -> Self {
        Self::PackageError {
            message: message.into(),
            package,
            source: None,
        }
    }

    pub fn package_error_with_source(
        message: impl Into<String>,
        package: Option<String>,
        source: PackageNameError,
    ) -> Self {
        Self::PackageError {
            message: message.into(),
            package,
            source: Some(source),
        }
    }
}

impl From<ProviderError> for AssetGitError {
    fn from(error: ProviderError) -> Self {
        Self::provider_error_with_source("Git provider operation failed", error)
    }
}

impl From<ConfigStoreError> for AssetGitError {
    fn from(error: ConfigStoreError) -> Self {
        Self::config_error_with_source("Failed to load settings", error)
    }
}

impl From<PackageNameError> for AssetGitError {
    fn from(error: PackageNameError) -> Self {
        Self::package_error_with_source("Invalid package name", None, error)
    }
}
