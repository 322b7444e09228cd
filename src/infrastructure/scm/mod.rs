/// Source control provider infrastructure
///
/// Resolves the git working tree once at startup and hands out the
/// repository handle the rest of the crate works against.
pub mod git_provider;

pub use git_provider::{GitProvider, ProviderError};
