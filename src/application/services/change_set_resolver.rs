use crate::common::error::AssetGitError;
use crate::common::result::{AssetGitResult, AssetGitResultExt};
use crate::domain::entities::change_set::ChangeSet;
use crate::domain::entities::repository_handle::RepositoryHandle;
use crate::domain::value_objects::package_name::{PackageName, PackageNameMapper};
use crate::domain::value_objects::status_line::StatusLine;
use crate::infrastructure::process::command_runner::CommandRunner;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// リモートとの差分およびローカルの未コミット変更からChange-Setを求めるサービス
///
/// 下位のコマンドが失敗した場合、その寄与は空として扱い処理を継続する。
/// リモートへ未pushのローカルコミットはリモート側の変更と区別されない。
pub struct ChangeSetResolver {
    runner: Arc<dyn CommandRunner>,
    repository: Arc<RepositoryHandle>,
    mapper: PackageNameMapper,
}

impl ChangeSetResolver {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        repository: Arc<RepositoryHandle>,
        mapper: PackageNameMapper,
    ) -> Self {
        Self {
            runner,
            repository,
            mapper,
        }
    }

    /// 差分のあるパスを挿入順・重複なしで返す
    ///
    /// `remote_ref` が `None` の場合（追跡ブランチなし）はリモート差分を省略する。
    pub async fn resolve_changed_paths(&self, remote_ref: Option<&str>) -> ChangeSet {
        let mut changes = ChangeSet::new();

        match remote_ref {
            Some(remote_ref) => {
                let args = vec![
                    "--stat".to_string(),
                    "--name-only".to_string(),
                    format!("..{}", remote_ref),
                ];
                let diff = self.runner.run(&self.repository, "diff", &args, &[]).await;
                if diff.ok {
                    changes.extend(diff.stdout_lines.iter().map(|line| line.trim()));
                } else {
                    warn!(
                        target: "source_control",
                        "Listing files changed on {} failed: {}",
                        remote_ref,
                        diff.stderr_lines.join("; ")
                    );
                }
            }
            None => debug!("No remote branch to compare against, skipping diff"),
        }

        let args = vec![
            "--porcelain".to_string(),
            "--untracked-files=no".to_string(),
        ];
        let status = self.runner.run(&self.repository, "status", &args, &[]).await;
        if status.ok {
            changes.extend(
                status
                    .stdout_lines
                    .iter()
                    .filter_map(|line| StatusLine::parse(line))
                    .filter(StatusLine::is_modified_or_added)
                    .map(|line| line.path),
            );
        } else {
            warn!(
                target: "source_control",
                "Querying working tree status failed: {}",
                status.stderr_lines.join("; ")
            );
        }

        info!(target: "source_control", "{} files changed", changes.len());
        changes
    }

    /// Change-Setのパスをパッケージ名へ変換する（変換できないパスはログに残して除外）
    ///
    /// 同じパッケージに対応する複数のパス（`.uasset` と `.umap`）は1つにまとめる。
    pub fn map_to_packages(&self, changes: &ChangeSet) -> Vec<PackageName> {
        let mut seen = HashSet::new();
        changes
            .iter()
            .filter_map(|path| {
                let mapped: AssetGitResult<PackageName> = self
                    .mapper
                    .filename_to_package(Path::new(path))
                    .map_err(AssetGitError::from);
                mapped.to_option_logged()
            })
            .filter(|package| seen.insert(package.clone()))
            .collect()
    }

    /// 追跡中のリモートブランチに対する変更パッケージ
    pub async fn resolve_changed_packages(&self) -> Vec<PackageName> {
        let remote_ref = self.repository.remote_ref();
        let changes = self.resolve_changed_paths(remote_ref.as_deref()).await;
        self.map_to_packages(&changes)
    }
}
