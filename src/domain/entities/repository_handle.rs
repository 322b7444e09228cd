use std::path::{Path, PathBuf};

/// 作業ツリーとgitバイナリを特定するハンドル
///
/// プロバイダの初期化時に一度だけ作成され、以後は変更されない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryHandle {
    /// 作業ツリーのルート
    root: PathBuf,

    /// gitバイナリのパス
    binary_path: PathBuf,

    /// リモート名（例: origin）
    remote: String,

    /// 現在のブランチ（detached HEADの場合はNone）
    branch: Option<String>,

    /// リモートのURL（未設定の場合はNone）
    remote_url: Option<String>,
}

impl RepositoryHandle {
    /// 新しいRepositoryHandleを作成
    pub fn new(
        root: impl Into<PathBuf>,
        binary_path: impl Into<PathBuf>,
        remote: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            binary_path: binary_path.into(),
            remote: remote.into(),
            branch: None,
            remote_url: None,
        }
    }

    /// ブランチを設定
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        let branch = branch.into();
        // `rev-parse --abbrev-ref HEAD` は detached HEAD で "HEAD" を返す
        self.branch = if branch.is_empty() || branch == "HEAD" {
            None
        } else {
            Some(branch)
        };
        self
    }

    /// リモートURLを設定
    pub fn with_remote_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.remote_url = if url.trim().is_empty() {
            None
        } else {
            Some(url)
        };
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    pub fn remote_url(&self) -> Option<&str> {
        self.remote_url.as_deref()
    }

    /// Sync/Pushが実行可能か（リモートURLが設定されているか）
    pub fn has_remote_url(&self) -> bool {
        self.remote_url.is_some()
    }

    /// 追跡対象のリモート参照（例: `origin/main`）
    pub fn remote_ref(&self) -> Option<String> {
        self.branch
            .as_ref()
            .map(|branch| format!("{}/{}", self.remote, branch))
    }
}
