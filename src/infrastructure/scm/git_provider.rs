use crate::domain::entities::repository_handle::RepositoryHandle;
use crate::domain::value_objects::package_name::PackageNameMapper;
use crate::infrastructure::filesystem::config_store::Settings;
use crate::infrastructure::process::command_runner::CommandRunner;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Errors that can occur while setting up the git provider
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Git provider is not initialized")]
    NotInitialized,

    #[error("SCM executable not found: {executable}")]
    ExecutableNotFound { executable: String },

    #[error("Not a git working tree: {path}")]
    NotAWorkingTree { path: String },

    #[error("Command execution failed: {command}, stderr: {stderr}")]
    CommandFailed { command: String, stderr: String },
}

/// Owns the repository configuration for the lifetime of the orchestration module.
///
/// [`GitProvider::init`] resolves the working tree and produces the immutable
/// [`RepositoryHandle`] every component is constructed with;
/// [`GitProvider::teardown`] releases it.
pub struct GitProvider {
    settings: Settings,
    runner: Arc<dyn CommandRunner>,
    repository: Option<Arc<RepositoryHandle>>,
    git_version: Option<String>,
}

impl GitProvider {
    pub fn new(settings: Settings, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            settings,
            runner,
            repository: None,
            git_version: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn runner(&self) -> Arc<dyn CommandRunner> {
        Arc::clone(&self.runner)
    }

    pub fn git_version(&self) -> Option<&str> {
        self.git_version.as_deref()
    }

    pub fn is_initialized(&self) -> bool {
        self.repository.is_some()
    }

    /// Locate the working tree containing `directory` and build its handle
    pub async fn init(&mut self, directory: &Path) -> Result<Arc<RepositoryHandle>, ProviderError> {
        let bootstrap = RepositoryHandle::new(
            directory,
            PathBuf::from(&self.settings.git_binary),
            &self.settings.remote,
        );

        let version = self.runner.run(&bootstrap, "--version", &[], &[]).await;
        if !version.ok {
            return Err(ProviderError::ExecutableNotFound {
                executable: self.settings.git_binary.clone(),
            });
        }
        self.git_version = version.stdout_lines.first().cloned();

        let toplevel = self
            .runner
            .run(&bootstrap, "rev-parse", &["--show-toplevel".to_string()], &[])
            .await;
        let root = match toplevel.stdout_lines.first() {
            Some(root) if toplevel.ok => PathBuf::from(root.trim()),
            _ => {
                return Err(ProviderError::NotAWorkingTree {
                    path: directory.display().to_string(),
                })
            }
        };

        let mut handle = RepositoryHandle::new(
            &root,
            PathBuf::from(&self.settings.git_binary),
            &self.settings.remote,
        );

        let branch = self
            .runner
            .run(
                &handle,
                "rev-parse",
                &["--abbrev-ref".to_string(), "HEAD".to_string()],
                &[],
            )
            .await;
        match branch.stdout_lines.first() {
            Some(name) if branch.ok => handle = handle.with_branch(name.trim()),
            _ => warn!(target: "source_control", "Could not determine the current branch"),
        }

        let remote_url = self
            .runner
            .run(
                &handle,
                "remote",
                &["get-url".to_string(), self.settings.remote.clone()],
                &[],
            )
            .await;
        match remote_url.stdout_lines.first() {
            Some(url) if remote_url.ok => handle = handle.with_remote_url(url.trim()),
            _ => debug!("No URL configured for remote '{}'", self.settings.remote),
        }

        info!(
            target: "source_control",
            "Git provider initialized at {} (branch: {}, remote: {})",
            root.display(),
            handle.branch().unwrap_or("detached"),
            handle.remote_url().unwrap_or("none")
        );

        let handle = Arc::new(handle);
        self.repository = Some(Arc::clone(&handle));
        Ok(handle)
    }

    /// Handle of the initialized working tree
    pub fn repository(&self) -> Result<Arc<RepositoryHandle>, ProviderError> {
        self.repository.clone().ok_or(ProviderError::NotInitialized)
    }

    /// Maps between content files of the working tree and package names
    pub fn package_mapper(&self) -> Result<PackageNameMapper, ProviderError> {
        let repository = self.repository()?;
        Ok(PackageNameMapper::new(
            repository.root(),
            &self.settings.content_dir,
            self.settings.package_root.clone(),
            self.settings.asset_extensions.clone(),
        ))
    }

    /// Release the repository handle
    pub fn teardown(&mut self) {
        if self.repository.take().is_some() {
            info!(target: "source_control", "Git provider shut down");
        }
        self.git_version = None;
    }
}

impl Drop for GitProvider {
    fn drop(&mut self) {
        self.teardown();
    }
}
