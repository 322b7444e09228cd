use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::application::services::{
    change_set_resolver::ChangeSetResolver,
    reload_orchestrator::{ReloadOrchestrator, ResolveSummary},
    stash_coordinator::StashCoordinator,
};
use crate::domain::entities::{
    operation_state::OperationState, repository_handle::RepositoryHandle,
    unlink_record::UnlinkRecord,
};
use crate::domain::value_objects::{operation_kind::OperationKind, package_name::PackageNameMapper};
use crate::infrastructure::process::command_runner::{
    CommandRunner, CompletionEvent, CompletionReceiver, CompletionSender,
};
use crate::infrastructure::registry::package_registry::PackageRegistry;
use crate::presentation::ui::{
    feedback::Feedback,
    prompt::{PromptChoice, UserPrompt},
};

pub const OPERATION_IN_PROGRESS: &str = "Source control operation already in progress";
pub const SAVE_QUESTION: &str = "Save all modified assets before attempting to Sync?";
pub const SAVE_REQUIRED: &str = "Save All Assets before attempting to Sync!";
pub const STASH_REQUIRED: &str = "Stash away all modifications before attempting to Sync!";
pub const REVERT_QUESTION: &str = "Revert all modifications of the working tree?";

/// ユーザー操作の受付結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// 非同期実行を開始した（完了イベント待ち）
    Dispatched,
    /// 別のオペレーションが実行中のため拒否した
    Rejected,
    /// ユーザーが確認ダイアログを拒否した
    Declined,
    /// 前提条件を満たさないため中断した（保存されていない、stash拒否、リモート未設定）
    Aborted,
    /// 実行の投入に失敗し、失敗として完了処理を行った
    DispatchFailed,
}

/// コントローラーの構築に必要な協調オブジェクト一式
pub struct OrchestrationContext {
    pub repository: Arc<RepositoryHandle>,
    pub mapper: PackageNameMapper,
    pub runner: Arc<dyn CommandRunner>,
    pub registry: Arc<dyn PackageRegistry>,
    pub prompt: Arc<dyn UserPrompt>,
    pub feedback: Arc<dyn Feedback>,
    pub stash_message: String,
}

/// Sync/Push/Revert/Refresh のライフサイクルを管理するコントローラー
///
/// 同時に実行できるオペレーションは1つだけ。状態の変更は全て
/// コントローラーを所有するタスク上で行われ、バックグラウンドの完了
/// イベントはチャネル経由でこのタスクに戻される。
pub struct OperationController {
    repository: Arc<RepositoryHandle>,
    runner: Arc<dyn CommandRunner>,
    registry: Arc<dyn PackageRegistry>,
    prompt: Arc<dyn UserPrompt>,
    feedback: Arc<dyn Feedback>,
    resolver: ChangeSetResolver,
    stash: StashCoordinator,
    reloader: ReloadOrchestrator,
    state: OperationState,
    unlinked: Option<UnlinkRecord>,
    completions_tx: CompletionSender,
    completions_rx: CompletionReceiver,
}

impl OperationController {
    pub fn new(context: OrchestrationContext) -> Self {
        let OrchestrationContext {
            repository,
            mapper,
            runner,
            registry,
            prompt,
            feedback,
            stash_message,
        } = context;

        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            resolver: ChangeSetResolver::new(Arc::clone(&runner), Arc::clone(&repository), mapper),
            stash: StashCoordinator::new(
                Arc::clone(&runner),
                Arc::clone(&repository),
                Arc::clone(&feedback),
                stash_message,
            ),
            reloader: ReloadOrchestrator::new(Arc::clone(&registry)),
            repository,
            runner,
            registry,
            prompt,
            feedback,
            state: OperationState::Idle,
            unlinked: None,
            completions_tx,
            completions_rx,
        }
    }

    pub fn state(&self) -> &OperationState {
        &self.state
    }

    pub fn is_operation_in_progress(&self) -> bool {
        !self.state.is_idle()
    }

    /// 現在そのオペレーションを開始できるか
    pub fn can_execute(&self, operation: OperationKind) -> bool {
        self.state.is_idle() && (!operation.requires_remote() || self.repository.has_remote_url())
    }

    /// 未解決のアンリンク記録
    pub fn unlinked(&self) -> Option<&UnlinkRecord> {
        self.unlinked.as_ref()
    }

    pub async fn sync(&mut self) -> ActionOutcome {
        self.request(OperationKind::Sync).await
    }

    pub async fn push(&mut self) -> ActionOutcome {
        self.request(OperationKind::Push).await
    }

    pub async fn revert(&mut self) -> ActionOutcome {
        self.request(OperationKind::Revert).await
    }

    pub async fn refresh(&mut self, check_all_files: bool) -> ActionOutcome {
        self.request(OperationKind::Refresh { check_all_files }).await
    }

    /// ユーザー操作を受け付け、事前処理を行ってから非同期実行を投入する
    pub async fn request(&mut self, operation: OperationKind) -> ActionOutcome {
        if !self.state.is_idle() {
            debug!("Rejecting {} while {}", operation, self.state);
            self.feedback.notify_warning(OPERATION_IN_PROGRESS);
            return ActionOutcome::Rejected;
        }

        if operation.requires_remote() && !self.repository.has_remote_url() {
            self.feedback.notify_warning(&format!(
                "No URL configured for remote '{}', cannot {}",
                self.repository.remote(),
                operation
            ));
            return ActionOutcome::Aborted;
        }

        self.state = OperationState::Preparing(operation);
        let prepared = match operation {
            OperationKind::Sync => self.prepare_sync().await,
            OperationKind::Revert => self.prepare_revert(),
            OperationKind::Push | OperationKind::Refresh { .. } => ControlFlow::Continue(()),
        };
        if let ControlFlow::Break(outcome) = prepared {
            self.state = OperationState::Idle;
            return outcome;
        }

        self.dispatch(operation).await
    }

    async fn prepare_sync(&mut self) -> ControlFlow<ActionOutcome> {
        if !self.save_dirty_packages() {
            self.feedback.notify_warning(SAVE_REQUIRED);
            return ControlFlow::Break(ActionOutcome::Aborted);
        }

        // TODO: local commits not yet pushed are unlinked like remote changes; tell them apart
        let packages = self.resolver.resolve_changed_packages().await;
        self.unlinked = Some(self.reloader.unlink(&packages));

        let decision = self.stash.offer_stash(self.prompt.as_ref()).await;
        if !decision.proceed {
            self.resolve_unlinked();
            self.feedback.notify_warning(STASH_REQUIRED);
            return ControlFlow::Break(ActionOutcome::Aborted);
        }

        ControlFlow::Continue(())
    }

    fn prepare_revert(&mut self) -> ControlFlow<ActionOutcome> {
        if self.prompt.confirm(REVERT_QUESTION) == PromptChoice::Cancel {
            debug!("Revert declined");
            return ControlFlow::Break(ActionOutcome::Declined);
        }

        self.unlinked = Some(self.reloader.unlink_all());
        ControlFlow::Continue(())
    }

    /// 未保存のパッケージを保存する。全て保存された場合のみtrue
    fn save_dirty_packages(&self) -> bool {
        let dirty = self.registry.dirty_packages();
        if dirty.is_empty() {
            return true;
        }

        info!(target: "source_control", "{} packages have unsaved modifications", dirty.len());
        if self.prompt.confirm(SAVE_QUESTION) == PromptChoice::Cancel {
            return false;
        }

        self.registry.save_dirty_packages() && self.registry.dirty_packages().is_empty()
    }

    async fn dispatch(&mut self, operation: OperationKind) -> ActionOutcome {
        let submitted = self.runner.submit(
            &self.repository,
            operation,
            self.completions_tx.clone(),
        );

        match submitted {
            Ok(()) => {
                let progress = self.feedback.show_progress(operation.in_progress_message());
                self.state = OperationState::Dispatched {
                    operation,
                    progress: Some(progress),
                };
                info!(target: "source_control", "{} dispatched", operation);
                ActionOutcome::Dispatched
            }
            Err(e) => {
                warn!(target: "source_control", "{}", e);
                self.state = OperationState::Dispatched {
                    operation,
                    progress: None,
                };
                self.complete(CompletionEvent {
                    operation,
                    succeeded: false,
                })
                .await;
                ActionOutcome::DispatchFailed
            }
        }
    }

    /// 実行中オペレーションの完了イベントを待つ。実行中でなければNone
    pub async fn next_completion(&mut self) -> Option<CompletionEvent> {
        if !matches!(self.state, OperationState::Dispatched { .. }) {
            return None;
        }
        self.completions_rx.recv().await
    }

    /// 完了イベントの後処理（unstash、リロード、結果通知）
    pub async fn complete(&mut self, event: CompletionEvent) {
        let progress = match &self.state {
            OperationState::Dispatched {
                operation,
                progress,
            } if *operation == event.operation => *progress,
            _ => {
                warn!(
                    target: "source_control",
                    "Ignoring completion of {} while {}",
                    event.operation,
                    self.state
                );
                return;
            }
        };

        if let Some(token) = progress {
            self.feedback.clear_progress(token);
        }
        self.state = OperationState::Completing(event.operation);

        if event.operation.mutates_working_tree() {
            self.stash.restore_stash().await;
            self.resolve_unlinked();
        }

        self.feedback
            .show_result(event.operation_name(), event.succeeded);
        self.state = OperationState::Idle;
    }

    /// 操作を受け付け、投入できた場合は完了まで待つ
    pub async fn execute(&mut self, operation: OperationKind) -> (ActionOutcome, Option<bool>) {
        let outcome = self.request(operation).await;
        match outcome {
            ActionOutcome::Dispatched => match self.next_completion().await {
                Some(event) => {
                    let succeeded = event.succeeded;
                    self.complete(event).await;
                    (outcome, Some(succeeded))
                }
                None => (outcome, None),
            },
            ActionOutcome::DispatchFailed => (outcome, Some(false)),
            _ => (outcome, None),
        }
    }

    fn resolve_unlinked(&mut self) -> Option<ResolveSummary> {
        let record = self.unlinked.take()?;
        let summary = self.reloader.resolve(record);
        debug!(
            "Resolved unlinked packages: {} reloaded, {} unloaded",
            summary.reloaded.len(),
            summary.unloaded.len()
        );
        Some(summary)
    }
}
