pub mod change_set_resolver;
pub mod reload_orchestrator;
pub mod stash_coordinator;

pub use change_set_resolver::ChangeSetResolver;
pub use reload_orchestrator::{ReloadOrchestrator, ResolveSummary};
pub use stash_coordinator::{StashCoordinator, StashDecision};
