use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::infrastructure::filesystem::config_store::{ConfigStore, Settings, SETTINGS_FILE_NAME};
use crate::presentation::cli::session::{Session, SessionOptions};

/// Write a default settings file at the repository root
pub struct InitCommand {
    /// Overwrite an existing settings file
    pub force: bool,
    pub options: SessionOptions,
}

impl InitCommand {
    pub fn new(force: bool, options: SessionOptions) -> Self {
        Self { force, options }
    }

    /// Execute the init command
    pub async fn execute(&self, directory: &Path) -> Result<()> {
        let session = Session::open(directory, self.options.clone()).await?;
        let target_file = ConfigStore::settings_path(session.repository().root());

        if target_file.exists() && !self.force {
            return Err(anyhow::anyhow!(
                "File {} already exists. Use --force to overwrite.",
                target_file.display()
            ));
        }

        ConfigStore::new().write_settings(&target_file, &Settings::default(), self.force)?;

        println!("{} Created {}", "✓".green().bold(), SETTINGS_FILE_NAME);
        println!("  Location: {}", target_file.display());
        Ok(())
    }
}
