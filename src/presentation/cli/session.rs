use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::application::services::change_set_resolver::ChangeSetResolver;
use crate::application::use_cases::operation_lifecycle::{OperationController, OrchestrationContext};
use crate::common::error::AssetGitError;
use crate::common::result::AssetGitResult;
use crate::domain::entities::repository_handle::RepositoryHandle;
use crate::domain::value_objects::package_name::PackageNameMapper;
use crate::infrastructure::filesystem::config_store::{ConfigStore, Settings};
use crate::infrastructure::process::command_runner::{CommandRunner, GitCommandRunner};
use crate::infrastructure::registry::package_registry::FileBackedPackageRegistry;
use crate::infrastructure::scm::git_provider::GitProvider;
use crate::presentation::ui::{feedback::TerminalFeedback, prompt::TerminalPrompt};

/// Options shared by every command that works on a repository
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Overrides `git_binary` from the settings file
    pub git_binary: Option<String>,
    pub assume_yes: bool,
    pub use_color: bool,
}

/// Initialized provider plus the collaborators built from it
pub struct Session {
    provider: GitProvider,
    repository: Arc<RepositoryHandle>,
    mapper: PackageNameMapper,
    registry: FileBackedPackageRegistry,
    options: SessionOptions,
}

impl Session {
    /// Locate the working tree containing `directory` and load its settings
    pub async fn open(directory: &Path, options: SessionOptions) -> AssetGitResult<Self> {
        let runner: Arc<dyn CommandRunner> = Arc::new(GitCommandRunner::new());

        let bootstrap = apply_overrides(Settings::default(), &options);
        let mut provider = GitProvider::new(bootstrap.clone(), Arc::clone(&runner));
        let mut repository = initialize(&mut provider, directory).await?;

        let stored = ConfigStore::new().load(repository.root()).map_err(|e| {
            AssetGitError::config_error_with_source(
                format!(
                    "Failed to load {}",
                    ConfigStore::settings_path(repository.root()).display()
                ),
                e,
            )
        })?;
        let settings = apply_overrides(stored, &options);
        if settings != bootstrap {
            debug!("Re-initializing git provider with repository settings");
            provider.teardown();
            provider = GitProvider::new(settings, runner);
            repository = initialize(&mut provider, directory).await?;
        }

        let mapper = provider.package_mapper()?;
        let registry = FileBackedPackageRegistry::new(mapper.clone());

        Ok(Self {
            provider,
            repository,
            mapper,
            registry,
            options,
        })
    }

    pub fn provider(&self) -> &GitProvider {
        &self.provider
    }

    pub fn settings(&self) -> &Settings {
        self.provider.settings()
    }

    pub fn repository(&self) -> &Arc<RepositoryHandle> {
        &self.repository
    }

    pub fn registry(&self) -> &FileBackedPackageRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> ChangeSetResolver {
        ChangeSetResolver::new(
            self.provider.runner(),
            Arc::clone(&self.repository),
            self.mapper.clone(),
        )
    }

    /// Build the lifecycle controller over the terminal prompt and feedback
    pub fn controller(&self) -> OperationController {
        OperationController::new(OrchestrationContext {
            repository: Arc::clone(&self.repository),
            mapper: self.mapper.clone(),
            runner: self.provider.runner(),
            registry: Arc::new(self.registry.clone()),
            prompt: Arc::new(TerminalPrompt::new(
                self.options.assume_yes,
                self.options.use_color,
            )),
            feedback: Arc::new(TerminalFeedback::new(self.options.use_color)),
            stash_message: self.settings().stash_message.clone(),
        })
    }
}

async fn initialize(
    provider: &mut GitProvider,
    directory: &Path,
) -> AssetGitResult<Arc<RepositoryHandle>> {
    provider.init(directory).await.map_err(|e| {
        AssetGitError::provider_error_with_source("Failed to initialize git provider", e)
    })
}

fn apply_overrides(mut settings: Settings, options: &SessionOptions) -> Settings {
    if let Some(git_binary) = &options.git_binary {
        settings.git_binary = git_binary.clone();
    }
    settings
}
