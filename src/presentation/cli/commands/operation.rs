use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::application::use_cases::operation_lifecycle::ActionOutcome;
use crate::domain::value_objects::operation_kind::OperationKind;
use crate::presentation::cli::session::{Session, SessionOptions};

/// Run one source control operation through the lifecycle controller and
/// wait for its completion
pub struct OperationCommand {
    pub operation: OperationKind,
    /// Load every project package first so the reload logic has work to do
    pub load_all: bool,
    pub options: SessionOptions,
}

impl OperationCommand {
    pub fn new(operation: OperationKind, load_all: bool, options: SessionOptions) -> Self {
        Self {
            operation,
            load_all,
            options,
        }
    }

    pub async fn execute(&self, directory: &Path) -> Result<()> {
        let session = Session::open(directory, self.options.clone()).await?;
        if self.load_all {
            let loaded = session.registry().load_all();
            info!("Loaded {} packages", loaded.len());
        }

        let mut controller = session.controller();
        let (outcome, succeeded) = controller.execute(self.operation).await;

        match (outcome, succeeded) {
            (ActionOutcome::Dispatched, Some(true)) | (ActionOutcome::Declined, _) => Ok(()),
            (ActionOutcome::Dispatched, None) => Err(anyhow::anyhow!(
                "{} finished without reporting a result",
                self.operation
            )),
            (ActionOutcome::Aborted, _) => {
                Err(anyhow::anyhow!("{} aborted before it started", self.operation))
            }
            (ActionOutcome::Rejected, _) => Err(anyhow::anyhow!(
                "Another source control operation is in progress"
            )),
            _ => Err(anyhow::anyhow!("{} operation failed", self.operation)),
        }
    }
}
