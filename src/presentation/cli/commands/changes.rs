use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

use crate::domain::value_objects::package_name::PackageName;
use crate::presentation::cli::session::{Session, SessionOptions};

/// Paths a Sync would touch and the packages they map to
#[derive(Debug, Serialize)]
pub struct ChangesReport {
    pub remote_ref: Option<String>,
    pub paths: Vec<String>,
    pub packages: Vec<PackageName>,
}

/// Print the change set resolved against the tracked remote branch
pub struct ChangesCommand {
    pub json: bool,
    pub options: SessionOptions,
}

impl ChangesCommand {
    pub fn new(json: bool, options: SessionOptions) -> Self {
        Self { json, options }
    }

    pub async fn execute(&self, directory: &Path) -> Result<()> {
        let session = Session::open(directory, self.options.clone()).await?;
        let resolver = session.resolver();

        let remote_ref = session.repository().remote_ref();
        let paths = resolver.resolve_changed_paths(remote_ref.as_deref()).await;
        let packages = resolver.map_to_packages(&paths);
        let report = ChangesReport {
            remote_ref,
            paths: paths.iter().map(str::to_string).collect(),
            packages,
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            self.print_report(&report);
        }
        Ok(())
    }

    fn print_report(&self, report: &ChangesReport) {
        match &report.remote_ref {
            Some(remote_ref) => println!("{} Changes against {}", "::".blue().bold(), remote_ref),
            None => println!("{} Local changes (no tracked remote branch)", "::".blue().bold()),
        }
        if report.paths.is_empty() {
            println!("  nothing changed");
            return;
        }
        for path in &report.paths {
            println!("  {}", path);
        }
        println!(
            "{} {} files, {} packages",
            "->".dimmed(),
            report.paths.len(),
            report.packages.len()
        );
    }
}
