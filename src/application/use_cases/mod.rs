pub mod operation_lifecycle;

pub use operation_lifecycle::{ActionOutcome, OperationController, OrchestrationContext};
