use super::package_handle::PackageHandle;

/// VCS操作の間ディスクから切り離されたパッケージの記録
///
/// 操作開始時に作成され、完了時にリロードまたはアンロードされて消費される。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnlinkRecord {
    handles: Vec<PackageHandle>,
}

impl UnlinkRecord {
    pub fn new(handles: Vec<PackageHandle>) -> Self {
        Self { handles }
    }

    pub fn handles(&self) -> &[PackageHandle] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// 記録を消費してハンドルを取り出す
    pub fn into_handles(self) -> Vec<PackageHandle> {
        self.handles
    }
}
