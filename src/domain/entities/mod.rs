pub mod change_set;
pub mod operation_state;
pub mod package_handle;
pub mod repository_handle;
pub mod unlink_record;

pub use change_set::ChangeSet;
pub use operation_state::{OperationState, ProgressToken};
pub use package_handle::{PackageHandle, PackageId};
pub use repository_handle::RepositoryHandle;
pub use unlink_record::UnlinkRecord;
