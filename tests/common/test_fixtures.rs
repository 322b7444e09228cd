//! Test fixtures
//!
//! A project directory with a content folder of asset files, plus the
//! controller wired to scripted collaborators.

use super::mock_services::{RecordingFeedback, RecordingPrompt, ScriptedCommandRunner};
use assetgit::application::use_cases::operation_lifecycle::{
    OperationController, OrchestrationContext,
};
use assetgit::domain::entities::repository_handle::RepositoryHandle;
use assetgit::domain::value_objects::package_name::{PackageName, PackageNameMapper};
use assetgit::infrastructure::registry::package_registry::FileBackedPackageRegistry;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const STASH_MESSAGE: &str = "Stashed by assetgit";

/// Project directory with `Content/` asset files
pub struct ProjectFixture {
    pub temp_dir: TempDir,
    pub mapper: PackageNameMapper,
}

impl ProjectFixture {
    pub fn new(assets: &[&str]) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let fixture = Self {
            mapper: PackageNameMapper::new(
                temp_dir.path(),
                "Content",
                "/Game",
                vec![".uasset".to_string(), ".umap".to_string()],
            ),
            temp_dir,
        };
        for asset in assets {
            fixture.write_asset(asset, b"v1");
        }
        fixture
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn asset_path(&self, relative: &str) -> PathBuf {
        self.root().join("Content").join(relative)
    }

    pub fn write_asset(&self, relative: &str, contents: &[u8]) {
        let path = self.asset_path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    pub fn repository(&self) -> RepositoryHandle {
        RepositoryHandle::new(self.root(), "git", "origin")
            .with_branch("main")
            .with_remote_url("git@example.com:team/project.git")
    }

    pub fn registry(&self) -> FileBackedPackageRegistry {
        FileBackedPackageRegistry::new(self.mapper.clone())
    }
}

pub fn package(name: &str) -> PackageName {
    PackageName::new(name).unwrap()
}

/// Controller with its scripted collaborators kept accessible to the test
pub struct ControllerFixture {
    pub project: ProjectFixture,
    pub registry: FileBackedPackageRegistry,
    pub runner: Arc<ScriptedCommandRunner>,
    pub prompt: Arc<RecordingPrompt>,
    pub feedback: Arc<RecordingFeedback>,
    pub controller: OperationController,
}

impl ControllerFixture {
    pub fn new(project: ProjectFixture, prompt: RecordingPrompt) -> Self {
        let registry = project.registry();
        let runner = Arc::new(ScriptedCommandRunner::new());
        let prompt = Arc::new(prompt);
        let feedback = Arc::new(RecordingFeedback::new());

        let controller = OperationController::new(OrchestrationContext {
            repository: Arc::new(project.repository()),
            mapper: project.mapper.clone(),
            runner: runner.clone(),
            registry: Arc::new(registry.clone()),
            prompt: prompt.clone(),
            feedback: feedback.clone(),
            stash_message: STASH_MESSAGE.to_string(),
        });

        Self {
            project,
            registry,
            runner,
            prompt,
            feedback,
            controller,
        }
    }
}
