pub mod changes;
pub mod init;
pub mod operation;
pub mod status;

pub use changes::*;
pub use init::*;
pub use operation::*;
pub use status::*;
