//! # assetgit - git sync/revert for editors with loaded assets
//!
//! `assetgit` coordinates a git working tree with packages an editor holds in
//! memory. Running `git pull` or `git reset --hard` underneath loaded packages
//! corrupts them; this crate wraps those operations in a protocol that keeps
//! them consistent:
//!
//! 1. save dirty packages,
//! 2. compute the files the operation will touch,
//! 3. unlink the loaded packages backed by those files,
//! 4. stash local modifications (Sync only),
//! 5. run the git operation in the background,
//! 6. pop the stash and hot-reload or unload every unlinked package,
//! 7. report the outcome.
//!
//! At most one operation runs at a time; a second request while one is in
//! flight is rejected with a warning.
//!
//! ## Quick Start
//!
//! ```bash
//! assetgit status
//! assetgit changes --json
//! assetgit sync --load-all
//! assetgit revert --yes
//! ```
//!
//! An optional `.assetgit.yml` at the repository root configures the git
//! binary, the remote, the content directory and the package root:
//!
//! ```yaml
//! git_binary: git
//! remote: origin
//! content_dir: Content
//! package_root: /Game
//! asset_extensions: [".uasset", ".umap"]
//! ```
//!
//! ## Architecture
//!
//! - [`domain`]: package names, operation kinds, change sets and lifecycle state
//! - [`application`]: change-set resolver, stash coordinator, reload
//!   orchestrator and the [`application::use_cases::OperationController`]
//! - [`infrastructure`]: git process execution, git provider setup, the
//!   package registry and the settings file
//! - [`presentation`]: terminal prompt/feedback and the CLI
//! - [`common`]: shared error handling
//!
//! ## Using the Library
//!
//! ```rust,no_run
//! use assetgit::application::use_cases::{OperationController, OrchestrationContext};
//! use assetgit::infrastructure::{
//!     FileBackedPackageRegistry, GitCommandRunner, GitProvider, Settings,
//! };
//! use assetgit::presentation::ui::{TerminalFeedback, TerminalPrompt};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> assetgit::Result<()> {
//! let settings = Settings::default();
//! let stash_message = settings.stash_message.clone();
//! let mut provider = GitProvider::new(settings, Arc::new(GitCommandRunner::new()));
//! let repository = provider.init(Path::new(".")).await?;
//! let mapper = provider.package_mapper()?;
//!
//! let mut controller = OperationController::new(OrchestrationContext {
//!     repository,
//!     mapper: mapper.clone(),
//!     runner: provider.runner(),
//!     registry: Arc::new(FileBackedPackageRegistry::new(mapper)),
//!     prompt: Arc::new(TerminalPrompt::new(false, true)),
//!     feedback: Arc::new(TerminalFeedback::new(true)),
//!     stash_message,
//! });
//!
//! controller.sync().await;
//! if let Some(event) = controller.next_completion().await {
//!     controller.complete(event).await;
//! }
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::AssetGitError;
pub use crate::common::result::AssetGitResult as Result;
