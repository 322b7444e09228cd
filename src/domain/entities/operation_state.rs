use crate::domain::value_objects::operation_kind::OperationKind;
use std::fmt;

/// Token returned by the feedback layer for a displayed progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgressToken(pub u64);

/// オペレーションのライフサイクル状態
///
/// `Idle → Preparing → Dispatched → Completing → Idle`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationState {
    /// 実行中のオペレーションなし
    Idle,
    /// 事前処理中（保存、変更セット解決、アンリンク、stash）
    Preparing(OperationKind),
    /// VCS操作を非同期実行中。進捗表示が実行中マーカーとなる
    Dispatched {
        operation: OperationKind,
        progress: Option<ProgressToken>,
    },
    /// 完了イベントの後処理中（unstash、リロード、通知）
    Completing(OperationKind),
}

impl OperationState {
    pub fn is_idle(&self) -> bool {
        matches!(self, OperationState::Idle)
    }

    /// 現在のオペレーション（Idleの場合はNone）
    pub fn operation(&self) -> Option<OperationKind> {
        match self {
            OperationState::Idle => None,
            OperationState::Preparing(op) | OperationState::Completing(op) => Some(*op),
            OperationState::Dispatched { operation, .. } => Some(*operation),
        }
    }
}

impl Default for OperationState {
    fn default() -> Self {
        OperationState::Idle
    }
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationState::Idle => write!(f, "idle"),
            OperationState::Preparing(op) => write!(f, "preparing {}", op),
            OperationState::Dispatched { operation, .. } => write!(f, "dispatched {}", operation),
            OperationState::Completing(op) => write!(f, "completing {}", op),
        }
    }
}
