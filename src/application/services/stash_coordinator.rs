use crate::domain::entities::repository_handle::RepositoryHandle;
use crate::infrastructure::process::command_runner::CommandRunner;
use crate::presentation::ui::feedback::Feedback;
use crate::presentation::ui::prompt::{PromptChoice, UserPrompt};
use std::sync::Arc;
use tracing::{debug, info};

pub const STASH_QUESTION: &str =
    "Stash (save) all modifications of the working tree? Required to Sync/Pull!";
pub const STASH_FAILED: &str = "Stashing away modifications failed!";
pub const UNSTASH_FAILED: &str = "Unstashing previously saved modifications failed!";

/// Result of offering to stash local modifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StashDecision {
    /// false when the user refused and the destructive operation must abort
    pub proceed: bool,
}

/// 破壊的な同期操作の前後でローカル変更をstash/unstashするサービス
pub struct StashCoordinator {
    runner: Arc<dyn CommandRunner>,
    repository: Arc<RepositoryHandle>,
    feedback: Arc<dyn Feedback>,
    message: String,
    /// Stash Token: 今回の操作でstashを作成したか
    stash_made: bool,
}

impl StashCoordinator {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        repository: Arc<RepositoryHandle>,
        feedback: Arc<dyn Feedback>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            runner,
            repository,
            feedback,
            message: message.into(),
            stash_made: false,
        }
    }

    pub fn has_stash(&self) -> bool {
        self.stash_made
    }

    /// 追跡ファイルに変更があればユーザーに確認してstashする
    ///
    /// stashの作成に失敗しても警告のみで処理は継続する。
    pub async fn offer_stash(&mut self, prompt: &dyn UserPrompt) -> StashDecision {
        self.stash_made = false;

        let status_args = vec![
            "--porcelain".to_string(),
            "--untracked-files=no".to_string(),
        ];
        let status = self
            .runner
            .run(&self.repository, "status", &status_args, &[])
            .await;
        if !status.ok || status.stdout_lines.is_empty() {
            debug!("Working tree clean, nothing to stash");
            return StashDecision { proceed: true };
        }

        if prompt.confirm(STASH_QUESTION) == PromptChoice::Cancel {
            debug!("User declined to stash {} modifications", status.stdout_lines.len());
            return StashDecision { proceed: false };
        }

        let stash_args = vec!["save".to_string(), self.message.clone()];
        let stash = self
            .runner
            .run(&self.repository, "stash", &stash_args, &[])
            .await;
        if stash.ok {
            info!(target: "source_control", "Stashed {} modifications", status.stdout_lines.len());
            self.stash_made = true;
        } else {
            self.feedback.notify_warning(STASH_FAILED);
        }

        StashDecision { proceed: true }
    }

    /// 操作開始時にstashを作成していればpopする
    pub async fn restore_stash(&mut self) {
        if !self.stash_made {
            return;
        }
        self.stash_made = false;

        let pop = self
            .runner
            .run(&self.repository, "stash", &["pop".to_string()], &[])
            .await;
        if pop.ok {
            info!(target: "source_control", "Re-applied stashed modifications");
        } else {
            self.feedback.notify_warning(UNSTASH_FAILED);
        }
    }
}
