use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

/// パッケージ名関連のエラー
#[derive(Debug, Error, PartialEq)]
pub enum PackageNameError {
    #[error("Empty package name")]
    Empty,

    #[error("Package name must start with '/': {0}")]
    MissingRoot(String),

    #[error("Invalid characters in package name: {0}")]
    InvalidCharacters(String),

    #[error("Path is not under the content directory '{content_dir}': {path}")]
    OutsideContentDir { path: String, content_dir: String },

    #[error("Path has no asset extension ({expected}): {path}")]
    NotAnAsset { path: String, expected: String },
}

fn segment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_\-]+$").expect("segment pattern is valid"))
}

/// エディタ内でロードされるパッケージの完全修飾名（例: `/Game/Maps/Level1`）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageName(String);

impl PackageName {
    /// 新しいPackageNameを作成
    pub fn new(name: &str) -> Result<Self, PackageNameError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(PackageNameError::Empty);
        }
        if !trimmed.starts_with('/') {
            return Err(PackageNameError::MissingRoot(trimmed.to_string()));
        }

        // ルート（/Game）＋アセット名で最低2セグメント
        let segments: Vec<&str> = trimmed[1..].split('/').collect();
        if segments.len() < 2 || segments.iter().any(|s| !segment_pattern().is_match(s)) {
            return Err(PackageNameError::InvalidCharacters(trimmed.to_string()));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// パッケージ名の文字列表現
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 最後のセグメント（アセット名）
    pub fn asset_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PackageName {
    type Error = PackageNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<PackageName> for String {
    fn from(value: PackageName) -> Self {
        value.0
    }
}

/// ファイルパスとパッケージ名の相互変換
///
/// `<content_dir>/Maps/Level1.umap` <-> `<package_root>/Maps/Level1`
#[derive(Debug, Clone)]
pub struct PackageNameMapper {
    repository_root: PathBuf,
    content_dir: PathBuf,
    package_root: String,
    asset_extensions: Vec<String>,
}

impl PackageNameMapper {
    pub fn new(
        repository_root: impl Into<PathBuf>,
        content_dir: impl AsRef<Path>,
        package_root: impl Into<String>,
        asset_extensions: Vec<String>,
    ) -> Self {
        let repository_root = repository_root.into();
        let content_dir = repository_root.join(content_dir);
        Self {
            repository_root,
            content_dir,
            package_root: package_root.into().trim_end_matches('/').to_string(),
            asset_extensions: asset_extensions
                .into_iter()
                .map(|ext| normalize_extension(&ext))
                .collect(),
        }
    }

    /// コンテンツディレクトリの絶対パス
    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    pub fn asset_extensions(&self) -> &[String] {
        &self.asset_extensions
    }

    /// Map a filename (absolute, or relative to the repository root) to its package name.
    pub fn filename_to_package(&self, filename: &Path) -> Result<PackageName, PackageNameError> {
        let absolute = if filename.is_absolute() {
            filename.to_path_buf()
        } else {
            self.repository_root.join(filename)
        };

        let relative = pathdiff::diff_paths(&absolute, &self.content_dir)
            .filter(|rel| rel.components().all(|c| matches!(c, Component::Normal(_))))
            .ok_or_else(|| PackageNameError::OutsideContentDir {
                path: filename.display().to_string(),
                content_dir: self.content_dir.display().to_string(),
            })?;

        let extension = relative
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        if !self
            .asset_extensions
            .iter()
            .any(|known| known.eq_ignore_ascii_case(&extension))
        {
            return Err(PackageNameError::NotAnAsset {
                path: filename.display().to_string(),
                expected: self.asset_extensions.join(", "),
            });
        }

        let without_extension = relative.with_extension("");
        let segments: Vec<String> = without_extension
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        PackageName::new(&format!("{}/{}", self.package_root, segments.join("/")))
    }

    /// Candidate backing files for a package, one per known asset extension.
    pub fn package_to_filenames(&self, package: &PackageName) -> Vec<PathBuf> {
        let relative = package
            .as_str()
            .strip_prefix(&self.package_root)
            .unwrap_or(package.as_str())
            .trim_start_matches('/');

        self.asset_extensions
            .iter()
            .map(|ext| {
                let mut path = self.content_dir.join(relative).into_os_string();
                path.push(ext);
                PathBuf::from(path)
            })
            .collect()
    }
}

fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}
