//! 実際のgitリポジトリを使った統合テスト
//!
//! bareリモートと2つのクローンを作成し、GitProvider・GitCommandRunner・
//! OperationControllerを実際のgitコマンドに対して動かす

mod common;

use assetgit::application::services::stash_coordinator::STASH_QUESTION;
use assetgit::application::use_cases::operation_lifecycle::{
    ActionOutcome, OperationController, OrchestrationContext, REVERT_QUESTION,
};
use assetgit::common::error::AssetGitError;
use assetgit::domain::entities::repository_handle::RepositoryHandle;
use assetgit::domain::value_objects::operation_kind::OperationKind;
use assetgit::infrastructure::filesystem::config_store::Settings;
use assetgit::infrastructure::process::command_runner::{CommandRunner, GitCommandRunner};
use assetgit::infrastructure::registry::package_registry::FileBackedPackageRegistry;
use assetgit::infrastructure::scm::git_provider::GitProvider;
use assetgit::presentation::cli::session::{Session, SessionOptions};
use common::mock_services::{RecordingFeedback, RecordingPrompt};
use common::test_fixtures::package;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use tempfile::TempDir;

/// gitコマンドを実行し、標準出力を返す（失敗した場合はパニック）
fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn configure_identity(dir: &Path) {
    git(dir, &["config", "user.name", "assetgit tests"]);
    git(dir, &["config", "user.email", "tests@example.com"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
}

fn write(dir: &Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// bareリモートと、そこから作成した2つのクローン
struct RemoteFixture {
    _temp_dir: TempDir,
    clone_a: PathBuf,
    clone_b: PathBuf,
}

impl RemoteFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        git(root, &["init", "--bare", "remote.git"]);
        let remote = root.join("remote.git");
        git(&remote, &["symbolic-ref", "HEAD", "refs/heads/main"]);

        git(root, &["init", "seed"]);
        let seed = root.join("seed");
        configure_identity(&seed);
        git(&seed, &["checkout", "-b", "main"]);
        write(&seed, "Content/Hero.uasset", "hero v1");
        write(&seed, "Content/Villain.uasset", "villain v1");
        write(&seed, "Content/Local.uasset", "local v1");
        git(&seed, &["add", "."]);
        git(&seed, &["commit", "-m", "Initial assets"]);
        git(&seed, &["remote", "add", "origin", remote.to_str().unwrap()]);
        git(&seed, &["push", "origin", "main"]);

        let mut clones = ["a", "b"].iter().map(|name| {
            git(root, &["clone", remote.to_str().unwrap(), name]);
            let clone = root.join(name);
            configure_identity(&clone);
            clone
        });
        let clone_a = clones.next().unwrap();
        let clone_b = clones.next().unwrap();

        Self {
            _temp_dir: temp_dir,
            clone_a,
            clone_b,
        }
    }
}

/// 実際のgitに対して動くコントローラー一式
struct GitHarness {
    repository: Arc<RepositoryHandle>,
    registry: FileBackedPackageRegistry,
    prompt: Arc<RecordingPrompt>,
    feedback: Arc<RecordingFeedback>,
    controller: OperationController,
}

impl GitHarness {
    async fn open(dir: &Path) -> Self {
        let settings = Settings::default();
        let stash_message = settings.stash_message.clone();
        let mut provider = GitProvider::new(settings, Arc::new(GitCommandRunner::new()));
        let repository = provider.init(dir).await.unwrap();
        let mapper = provider.package_mapper().unwrap();
        let registry = FileBackedPackageRegistry::new(mapper.clone());
        let prompt = Arc::new(RecordingPrompt::new());
        let feedback = Arc::new(RecordingFeedback::new());

        let controller = OperationController::new(OrchestrationContext {
            repository: Arc::clone(&repository),
            mapper,
            runner: provider.runner(),
            registry: Arc::new(registry.clone()),
            prompt: prompt.clone(),
            feedback: feedback.clone(),
            stash_message,
        });

        Self {
            repository,
            registry,
            prompt,
            feedback,
            controller,
        }
    }
}

#[tokio::test]
async fn test_provider_reads_working_tree_branch_and_remote() {
    let fixture = RemoteFixture::new();
    let mut provider = GitProvider::new(Settings::default(), Arc::new(GitCommandRunner::new()));

    let repository = provider.init(&fixture.clone_a.join("Content")).await.unwrap();

    assert_eq!(
        repository.root().canonicalize().unwrap(),
        fixture.clone_a.canonicalize().unwrap()
    );
    assert_eq!(repository.branch(), Some("main"));
    assert_eq!(repository.remote_ref().as_deref(), Some("origin/main"));
    assert!(repository.has_remote_url());
    assert!(provider
        .git_version()
        .is_some_and(|version| version.starts_with("git version")));
}

#[tokio::test]
async fn test_runner_reports_porcelain_status() {
    let fixture = RemoteFixture::new();
    write(&fixture.clone_a, "Content/Local.uasset", "local edited");
    let harness = GitHarness::open(&fixture.clone_a).await;

    let args = vec![
        "--porcelain".to_string(),
        "--untracked-files=no".to_string(),
    ];
    let output = GitCommandRunner::new()
        .run(&harness.repository, "status", &args, &[])
        .await;

    assert!(output.ok);
    assert_eq!(output.stdout_lines, vec![" M Content/Local.uasset".to_string()]);
}

#[tokio::test]
async fn test_sync_reloads_pulled_packages_and_keeps_local_edits() {
    let fixture = RemoteFixture::new();

    // clone B: Heroを更新し、Villainを削除してpush
    write(&fixture.clone_b, "Content/Hero.uasset", "hero v2");
    git(&fixture.clone_b, &["rm", "-q", "Content/Villain.uasset"]);
    git(&fixture.clone_b, &["commit", "-am", "Update hero, drop villain"]);
    git(&fixture.clone_b, &["push", "origin", "main"]);

    // clone A: リモートを取得し、Localをローカルで編集
    git(&fixture.clone_a, &["fetch", "origin"]);
    write(&fixture.clone_a, "Content/Local.uasset", "local edited");

    let mut harness = GitHarness::open(&fixture.clone_a).await;
    let hero = harness.registry.load(&package("/Game/Hero")).unwrap();
    let villain = harness.registry.load(&package("/Game/Villain")).unwrap();
    let local = harness.registry.load(&package("/Game/Local")).unwrap();

    let (outcome, succeeded) = harness.controller.execute(OperationKind::Sync).await;

    assert_eq!(outcome, ActionOutcome::Dispatched);
    assert_eq!(succeeded, Some(true));
    assert_eq!(harness.prompt.questions(), vec![STASH_QUESTION.to_string()]);
    assert_eq!(harness.feedback.results(), vec![("Sync".to_string(), true)]);

    assert_eq!(harness.registry.contents(&hero), Some(b"hero v2".to_vec()));
    assert_eq!(harness.registry.reload_count(&hero), 1);
    assert!(!harness.registry.is_valid(&villain));
    assert!(!fixture.clone_a.join("Content/Villain.uasset").exists());

    assert_eq!(
        fs::read_to_string(fixture.clone_a.join("Content/Local.uasset")).unwrap(),
        "local edited"
    );
    assert_eq!(
        harness.registry.contents(&local),
        Some(b"local edited".to_vec())
    );
    assert!(harness.registry.is_linked(&local));
    assert_eq!(git(&fixture.clone_a, &["stash", "list"]), "");
}

#[tokio::test]
async fn test_revert_restores_committed_contents() {
    let fixture = RemoteFixture::new();
    write(&fixture.clone_a, "Content/Hero.uasset", "hero scratch");

    let mut harness = GitHarness::open(&fixture.clone_a).await;
    let hero = harness.registry.load(&package("/Game/Hero")).unwrap();
    assert_eq!(harness.registry.contents(&hero), Some(b"hero scratch".to_vec()));

    let (outcome, succeeded) = harness.controller.execute(OperationKind::Revert).await;

    assert_eq!(outcome, ActionOutcome::Dispatched);
    assert_eq!(succeeded, Some(true));
    assert_eq!(harness.prompt.questions(), vec![REVERT_QUESTION.to_string()]);
    assert_eq!(harness.registry.contents(&hero), Some(b"hero v1".to_vec()));
    assert_eq!(harness.registry.reload_count(&hero), 1);
    assert_eq!(
        git(&fixture.clone_a, &["status", "--porcelain", "--untracked-files=no"]),
        ""
    );
}

#[tokio::test]
async fn test_refresh_runs_against_real_git() {
    let fixture = RemoteFixture::new();
    let mut harness = GitHarness::open(&fixture.clone_a).await;

    let (outcome, succeeded) = harness
        .controller
        .execute(OperationKind::Refresh {
            check_all_files: true,
        })
        .await;

    assert_eq!(outcome, ActionOutcome::Dispatched);
    assert_eq!(succeeded, Some(true));
    assert_eq!(
        harness.feedback.results(),
        vec![("UpdateStatus".to_string(), true)]
    );
}

#[tokio::test]
async fn test_invalid_settings_file_is_a_config_error() {
    let fixture = RemoteFixture::new();
    write(&fixture.clone_a, ".assetgit.yml", "remote: \"\"\n");

    match Session::open(&fixture.clone_a, SessionOptions::default()).await {
        Err(AssetGitError::ConfigError { message, source }) => {
            assert!(message.contains(".assetgit.yml"));
            assert!(source.is_some());
        }
        Err(other) => panic!("unexpected error: {other:?}"),
        Ok(_) => panic!("session opened with an invalid settings file"),
    }
}
