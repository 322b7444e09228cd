/// Infrastructure layer modules
///
/// This layer provides concrete implementations for external system interactions:
/// - Git provider setup (working tree, branch and remote discovery)
/// - Process execution (git commands and background operations)
/// - Package registry (loaded packages backed by content files)
/// - File system operations (settings file)
pub mod filesystem;
pub mod process;
pub mod registry;
pub mod scm;

// Re-export commonly used types
pub use filesystem::config_store::{ConfigStore, Settings};
pub use process::{CommandOutput, CommandRunner, CompletionEvent, GitCommandRunner};
pub use registry::{FileBackedPackageRegistry, PackageRegistry};
pub use scm::git_provider::{GitProvider, ProviderError};
