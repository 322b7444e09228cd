pub mod package_registry;

pub use package_registry::{FileBackedPackageRegistry, LoadState, PackageRegistry};
