use crate::common::error::AssetGitError;

/// assetgit全体で使用するResult型のエイリアス
///
/// # Examples
///
/// ```
/// use assetgit::common::result::AssetGitResult;
/// use assetgit::common::error::AssetGitError;
///
/// fn example_function() -> AssetGitResult<String> {
///     Ok("success".to_string())
/// }
///
/// fn example_with_error() -> AssetGitResult<()> {
///     Err(AssetGitError::package_error("Package not loaded", None))
/// }
/// ```
pub type AssetGitResult<T> = Result<T, AssetGitError>;

/// Resultのエラー変換ヘルパー
pub trait ResultExt<T, E> {
    /// ファイルシステムエラーとしてAssetGitResultに変換
    ///
    /// # Examples
    ///
    /// ```
    /// use assetgit::common::result::{AssetGitResult, ResultExt};
    ///
    /// let result: Result<String, std::io::Error> = Err(std::io::Error::new(
    ///     std::io::ErrorKind::NotFound, "file not found"
    /// ));
    /// let converted: AssetGitResult<String> = result.with_filesystem_error("read failed", None);
    /// assert!(converted.is_err());
    /// ```
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> AssetGitResult<T>
    where
        E: Into<std::io::Error>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> AssetGitResult<T>
    where
        E: Into<std::io::Error>,
    {
        self.map_err(|e| AssetGitError::filesystem_error_with_source(message, path, e.into()))
    }
}

/// チェーンオペレーション用のヘルパー
pub trait AssetGitResultExt<T> {
    /// Optionに変換（エラーをログ出力）
    fn to_option_logged(self) -> Option<T>;
}

impl<T> AssetGitResultExt<T> for AssetGitResult<T> {
    fn to_option_logged(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(target: "source_control", "{}", e);
                None
            }
        }
    }
}
