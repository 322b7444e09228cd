use serde::Serialize;
use std::collections::HashSet;

/// ローカルとリモートで差分があると判断されたパスの集合
///
/// 挿入順を保持し、重複は無視する。同期操作ごとに作成され、使用後に破棄される。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    paths: Vec<String>,
    #[serde(skip)]
    seen: HashSet<String>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// パスを追加する。既に含まれていた場合はfalse
    pub fn insert(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if path.is_empty() || self.seen.contains(&path) {
            return false;
        }
        self.seen.insert(path.clone());
        self.paths.push(path);
        true
    }

    pub fn contains(&self, path: &str) -> bool {
        self.seen.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<S: Into<String>> Extend<S> for ChangeSet {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        for path in iter {
            self.insert(path);
        }
    }
}

impl<S: Into<String>> FromIterator<S> for ChangeSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
