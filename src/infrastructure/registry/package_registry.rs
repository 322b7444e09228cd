use crate::common::error::AssetGitError;
use crate::common::result::{AssetGitResult, AssetGitResultExt, ResultExt};
use crate::domain::entities::package_handle::{PackageHandle, PackageId};
use crate::domain::value_objects::package_name::{PackageName, PackageNameMapper};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// In-memory view of the packages an editor session has loaded.
///
/// All methods take `&self`; implementations use interior mutability so the
/// registry can be shared between the orchestration components.
pub trait PackageRegistry: Send + Sync {
    /// Handle of the loaded package with this name, if any
    fn find_loaded(&self, name: &PackageName) -> Option<PackageHandle>;

    fn is_loaded(&self, name: &PackageName) -> bool {
        self.find_loaded(name).is_some()
    }

    /// Complete any in-flight asynchronous load of the package
    fn ensure_fully_loaded(&self, handle: &PackageHandle);

    /// Detach the package from its backing file so the file can be overwritten
    fn unlink(&self, handle: &PackageHandle);

    /// File currently backing the package
    fn package_filename(&self, handle: &PackageHandle) -> Option<PathBuf>;

    /// Refresh the packages from disk in place, keeping their identity
    fn hot_reload(&self, handles: &[PackageHandle]);

    /// Drop the packages; their handles become invalid
    fn unload(&self, handles: &[PackageHandle]);

    /// Every package in the project content directory
    fn enumerate_all_project_paths(&self) -> Vec<PackageName>;

    /// Packages with unsaved in-memory modifications
    fn dirty_packages(&self) -> Vec<PackageName>;

    /// Save every dirty package, returns false if any save failed
    fn save_dirty_packages(&self) -> bool;
}

/// Loading state of a package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// An asynchronous load was started but not finished
    Loading,
    /// Fully loaded
    Loaded,
}

#[derive(Debug, Clone)]
struct LoadedPackage {
    id: PackageId,
    name: PackageName,
    filename: PathBuf,
    contents: Vec<u8>,
    state: LoadState,
    linked: bool,
    dirty: bool,
    reload_count: u32,
}

#[derive(Debug, Default)]
struct RegistryState {
    next_id: u64,
    packages: BTreeMap<PackageName, LoadedPackage>,
}

impl RegistryState {
    fn by_handle(&mut self, handle: &PackageHandle) -> Option<&mut LoadedPackage> {
        self.packages
            .get_mut(handle.name())
            .filter(|package| package.id == handle.id())
    }
}

/// Package registry backed by files under the project content directory.
///
/// Clones share the same loaded packages.
#[derive(Debug, Clone)]
pub struct FileBackedPackageRegistry {
    mapper: PackageNameMapper,
    state: Arc<Mutex<RegistryState>>,
}

impl FileBackedPackageRegistry {
    pub fn new(mapper: PackageNameMapper) -> Self {
        Self {
            mapper,
            state: Arc::new(Mutex::new(RegistryState::default())),
        }
    }

    pub fn mapper(&self) -> &PackageNameMapper {
        &self.mapper
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn locate(&self, name: &PackageName) -> AssetGitResult<PathBuf> {
        self.mapper
            .package_to_filenames(name)
            .into_iter()
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| {
                AssetGitError::package_error(
                    "No backing file found for package",
                    Some(name.to_string()),
                )
            })
    }

    fn insert(&self, name: &PackageName, filename: PathBuf, contents: Vec<u8>, state: LoadState) -> PackageHandle {
        let mut registry = self.lock();
        if let Some(existing) = registry.packages.get(name) {
            return PackageHandle::new(existing.id, existing.name.clone());
        }

        registry.next_id += 1;
        let id = PackageId(registry.next_id);
        registry.packages.insert(
            name.clone(),
            LoadedPackage {
                id,
                name: name.clone(),
                filename,
                contents,
                state,
                linked: true,
                dirty: false,
                reload_count: 0,
            },
        );
        PackageHandle::new(id, name.clone())
    }

    /// Load a package synchronously from its backing file
    pub fn load(&self, name: &PackageName) -> AssetGitResult<PackageHandle> {
        if let Some(handle) = self.find_loaded(name) {
            return Ok(handle);
        }

        let filename = self.locate(name)?;
        let contents = fs::read(&filename)
            .with_filesystem_error("Failed to read package", Some(filename.clone()))?;
        debug!("Loaded {} from {}", name, filename.display());
        Ok(self.insert(name, filename, contents, LoadState::Loaded))
    }

    /// Start loading a package without reading it yet
    pub fn begin_async_load(&self, name: &PackageName) -> AssetGitResult<PackageHandle> {
        let filename = self.locate(name)?;
        Ok(self.insert(name, filename, Vec::new(), LoadState::Loading))
    }

    /// Load every package of the project
    pub fn load_all(&self) -> Vec<PackageHandle> {
        self.enumerate_all_project_paths()
            .iter()
            .filter_map(|name| self.load(name).to_option_logged())
            .collect()
    }

    /// Replace the in-memory contents of a package and mark it dirty
    pub fn modify(&self, handle: &PackageHandle, contents: impl Into<Vec<u8>>) -> bool {
        let mut registry = self.lock();
        match registry.by_handle(handle) {
            Some(package) => {
                package.contents = contents.into();
                package.state = LoadState::Loaded;
                package.dirty = true;
                true
            }
            None => false,
        }
    }

    pub fn contents(&self, handle: &PackageHandle) -> Option<Vec<u8>> {
        self.lock().by_handle(handle).map(|p| p.contents.clone())
    }

    pub fn load_state(&self, handle: &PackageHandle) -> Option<LoadState> {
        self.lock().by_handle(handle).map(|p| p.state)
    }

    pub fn is_linked(&self, handle: &PackageHandle) -> bool {
        self.lock().by_handle(handle).map_or(false, |p| p.linked)
    }

    /// Number of hot reloads the package went through
    pub fn reload_count(&self, handle: &PackageHandle) -> u32 {
        self.lock().by_handle(handle).map_or(0, |p| p.reload_count)
    }

    /// Whether the handle still designates a loaded package
    pub fn is_valid(&self, handle: &PackageHandle) -> bool {
        self.lock().by_handle(handle).is_some()
    }

    pub fn loaded_count(&self) -> usize {
        self.lock().packages.len()
    }
}

fn read_fully(package: &mut LoadedPackage) {
    match fs::read(&package.filename) {
        Ok(contents) => {
            package.contents = contents;
            package.state = LoadState::Loaded;
        }
        Err(e) => warn!(
            "Failed to finish loading {} from {}: {}",
            package.name,
            package.filename.display(),
            e
        ),
    }
}

impl PackageRegistry for FileBackedPackageRegistry {
    fn find_loaded(&self, name: &PackageName) -> Option<PackageHandle> {
        self.lock()
            .packages
            .get(name)
            .map(|p| PackageHandle::new(p.id, p.name.clone()))
    }

    fn ensure_fully_loaded(&self, handle: &PackageHandle) {
        let mut registry = self.lock();
        if let Some(package) = registry.by_handle(handle) {
            if package.state == LoadState::Loading {
                read_fully(package);
            }
        }
    }

    fn unlink(&self, handle: &PackageHandle) {
        if let Some(package) = self.lock().by_handle(handle) {
            package.linked = false;
        }
    }

    fn package_filename(&self, handle: &PackageHandle) -> Option<PathBuf> {
        self.lock().by_handle(handle).map(|p| p.filename.clone())
    }

    fn hot_reload(&self, handles: &[PackageHandle]) {
        let mut registry = self.lock();
        for handle in handles {
            let Some(package) = registry.by_handle(handle) else {
                warn!("Cannot reload {}: not loaded", handle);
                continue;
            };
            match fs::read(&package.filename) {
                Ok(contents) => {
                    package.contents = contents;
                    package.state = LoadState::Loaded;
                    package.linked = true;
                    package.dirty = false;
                    package.reload_count += 1;
                }
                Err(e) => warn!("Failed to reload {}: {}", handle, e),
            }
        }
        info!("Hot-reloaded {} packages", handles.len());
    }

    fn unload(&self, handles: &[PackageHandle]) {
        let mut registry = self.lock();
        for handle in handles {
            if registry.by_handle(handle).is_some() {
                registry.packages.remove(handle.name());
            }
        }
        info!("Unloaded {} packages", handles.len());
    }

    fn enumerate_all_project_paths(&self) -> Vec<PackageName> {
        let content_dir = self.mapper.content_dir();
        if !content_dir.is_dir() {
            warn!("Content directory not found: {}", content_dir.display());
            return Vec::new();
        }

        WalkDir::new(content_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable content entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && has_asset_extension(&self.mapper, entry.path()))
            .filter_map(|entry| {
                let mapped: AssetGitResult<PackageName> = self
                    .mapper
                    .filename_to_package(entry.path())
                    .map_err(AssetGitError::from);
                mapped.to_option_logged()
            })
            .collect()
    }

    fn dirty_packages(&self) -> Vec<PackageName> {
        self.lock()
            .packages
            .values()
            .filter(|p| p.dirty)
            .map(|p| p.name.clone())
            .collect()
    }

    fn save_dirty_packages(&self) -> bool {
        let mut registry = self.lock();
        let mut all_saved = true;
        for package in registry.packages.values_mut().filter(|p| p.dirty) {
            match fs::write(&package.filename, &package.contents) {
                Ok(()) => {
                    package.dirty = false;
                    debug!("Saved {}", package.name);
                }
                Err(e) => {
                    warn!("Failed to save {}: {}", package.name, e);
                    all_saved = false;
                }
            }
        }
        all_saved
    }
}

fn has_asset_extension(mapper: &PackageNameMapper, path: &Path) -> bool {
    let extension = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    mapper
        .asset_extensions()
        .iter()
        .any(|known| known.eq_ignore_ascii_case(&extension))
}
