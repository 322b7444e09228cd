use std::fmt;

/// ユーザー操作から生成されるソース管理オペレーション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// リモートの最新状態を取り込む（pull）
    Sync,
    /// ローカルコミットをリモートへ送る
    Push,
    /// 作業ツリーの変更を全て破棄する
    Revert,
    /// 全ファイルのステータスを更新する
    Refresh {
        /// 未追跡ファイルも含めてチェックするか
        check_all_files: bool,
    },
}

impl OperationKind {
    /// Name carried by the completion event and shown in result notifications.
    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::Sync => "Sync",
            OperationKind::Push => "Push",
            OperationKind::Revert => "Revert",
            OperationKind::Refresh { .. } => "UpdateStatus",
        }
    }

    /// Message displayed by the in-progress indicator.
    pub fn in_progress_message(&self) -> &'static str {
        match self {
            OperationKind::Sync => "Syncing files from the remote...",
            OperationKind::Push => "Pushing local commits to the remote...",
            OperationKind::Revert => "Reverting all modifications...",
            OperationKind::Refresh { .. } => "Updating source control status...",
        }
    }

    /// Whether the operation rewrites the working tree, so loaded packages
    /// must be unlinked before dispatch and resolved on completion.
    pub fn mutates_working_tree(&self) -> bool {
        matches!(self, OperationKind::Sync | OperationKind::Revert)
    }

    /// Whether the operation talks to the remote and needs a remote URL.
    pub fn requires_remote(&self) -> bool {
        matches!(self, OperationKind::Sync | OperationKind::Push)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
