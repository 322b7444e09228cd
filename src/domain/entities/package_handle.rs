use crate::domain::value_objects::package_name::PackageName;
use std::fmt;

/// Identity of a loaded package. Stable across hot reloads, retired on unload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId(pub u64);

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// メモリ上にロードされたパッケージへのハンドル
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageHandle {
    id: PackageId,
    name: PackageName,
}

impl PackageHandle {
    pub fn new(id: PackageId, name: PackageName) -> Self {
        Self { id, name }
    }

    pub fn id(&self) -> PackageId {
        self.id
    }

    pub fn name(&self) -> &PackageName {
        &self.name
    }
}

impl fmt::Display for PackageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
