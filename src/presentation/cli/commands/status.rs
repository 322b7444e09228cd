use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::domain::value_objects::status_line::StatusLine;
use crate::presentation::cli::session::{Session, SessionOptions};

/// Show the repository the orchestration layer works against
pub struct StatusCommand {
    pub options: SessionOptions,
}

impl StatusCommand {
    pub fn new(options: SessionOptions) -> Self {
        Self { options }
    }

    pub async fn execute(&self, directory: &Path) -> Result<()> {
        let session = Session::open(directory, self.options.clone()).await?;
        let repository = session.repository();

        println!("{}: {}", "root".bold(), repository.root().display());
        println!(
            "{}: {}",
            "branch".bold(),
            repository.branch().unwrap_or("(detached)").blue()
        );
        match repository.remote_url() {
            Some(url) => println!("{}: {} ({})", "remote".bold(), repository.remote(), url),
            None => println!(
                "{}: {} {}",
                "remote".bold(),
                repository.remote(),
                "(no URL, sync and push disabled)".yellow()
            ),
        }
        if let Some(version) = session.provider().git_version() {
            println!("{}: {}", "git".bold(), version);
        }

        let args = vec![
            "--porcelain".to_string(),
            "--untracked-files=all".to_string(),
        ];
        let status = session
            .provider()
            .runner()
            .run(repository, "status", &args, &[])
            .await;
        if !status.ok {
            return Err(anyhow::anyhow!(
                "git status failed: {}",
                status.stderr_lines.join("\n")
            ));
        }

        let lines: Vec<StatusLine> = status
            .stdout_lines
            .iter()
            .filter_map(|line| StatusLine::parse(line))
            .collect();
        let modified = lines.iter().filter(|l| l.is_modified_or_added()).count();
        let untracked = lines.iter().filter(|l| l.is_untracked()).count();

        if lines.is_empty() {
            println!("{}: {}", "working tree".bold(), "clean".green());
        } else {
            println!(
                "{}: {} [{}M {}U]",
                "working tree".bold(),
                "dirty".yellow(),
                modified,
                untracked
            );
        }
        Ok(())
    }
}
