use crate::domain::entities::package_handle::PackageHandle;
use crate::domain::entities::unlink_record::UnlinkRecord;
use crate::domain::value_objects::package_name::PackageName;
use crate::infrastructure::registry::package_registry::PackageRegistry;
use std::sync::Arc;
use tracing::info;

/// Outcome of resolving an [`UnlinkRecord`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveSummary {
    /// Packages whose backing file still existed and were hot-reloaded
    pub reloaded: Vec<PackageHandle>,
    /// Packages whose backing file was gone and were unloaded
    pub unloaded: Vec<PackageHandle>,
}

/// Detaches loaded packages before git rewrites their files, then reloads or
/// unloads them once it is done.
pub struct ReloadOrchestrator {
    registry: Arc<dyn PackageRegistry>,
}

impl ReloadOrchestrator {
    pub fn new(registry: Arc<dyn PackageRegistry>) -> Self {
        Self { registry }
    }

    /// Unlink every loaded package among `packages`; packages not loaded are skipped
    pub fn unlink(&self, packages: &[PackageName]) -> UnlinkRecord {
        let handles: Vec<PackageHandle> = packages
            .iter()
            .filter_map(|name| self.registry.find_loaded(name))
            .inspect(|handle| {
                self.registry.ensure_fully_loaded(handle);
                self.registry.unlink(handle);
            })
            .collect();

        info!(target: "source_control", "Reset loader for {} packages", handles.len());
        UnlinkRecord::new(handles)
    }

    /// Unlink every package of the project
    pub fn unlink_all(&self) -> UnlinkRecord {
        let packages = self.registry.enumerate_all_project_paths();
        self.unlink(&packages)
    }

    /// Reload the packages whose file still exists and unload the others.
    ///
    /// Existence is checked now, after git ran, since it may have deleted files.
    pub fn resolve(&self, record: UnlinkRecord) -> ResolveSummary {
        info!(target: "source_control", "Reloading {} packages...", record.len());

        let (reloaded, unloaded): (Vec<_>, Vec<_>) =
            record.into_handles().into_iter().partition(|handle| {
                self.registry
                    .package_filename(handle)
                    .map_or(false, |filename| filename.is_file())
            });

        if !reloaded.is_empty() {
            self.registry.hot_reload(&reloaded);
        }
        if !unloaded.is_empty() {
            self.registry.unload(&unloaded);
        }

        ResolveSummary { reloaded, unloaded }
    }
}
