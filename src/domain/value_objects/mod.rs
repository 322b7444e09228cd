pub mod operation_kind;
pub mod package_name;
pub mod status_line;

pub use operation_kind::OperationKind;
pub use package_name::{PackageName, PackageNameError, PackageNameMapper};
pub use status_line::StatusLine;
