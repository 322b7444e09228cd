pub mod commands;
pub mod session;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::env;
use std::path::PathBuf;
use std::process::exit;
use tracing_subscriber::EnvFilter;

use crate::domain::value_objects::operation_kind::OperationKind;
use crate::presentation::cli::commands::{
    changes::ChangesCommand, init::InitCommand, operation::OperationCommand,
    status::StatusCommand,
};
use crate::presentation::cli::session::SessionOptions;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_DATE"),
    ")"
);

/// assetgit - Keep loaded assets consistent while git rewrites the working tree
#[derive(Parser)]
#[command(name = "assetgit")]
#[command(about = "Sync, push and revert a git working tree without corrupting loaded assets")]
#[command(version, long_version = LONG_VERSION)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Working directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<String>,

    /// Git executable to use
    #[arg(long = "git", env = "ASSETGIT_GIT", global = true)]
    pub git_binary: Option<String>,

    /// Answer OK to every confirmation dialog
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default .assetgit.yml at the repository root
    Init {
        /// Force overwrite existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the repository, branch and remote in use
    Status,

    /// List the files and packages a sync would touch
    Changes {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pull remote changes, reloading affected packages
    Sync {
        /// Load every project package before syncing
        #[arg(long)]
        load_all: bool,
    },

    /// Push local commits to the remote
    Push,

    /// Revert all modifications of the working tree
    Revert {
        /// Load every project package before reverting
        #[arg(long)]
        load_all: bool,
    },

    /// Update the source control status of the working tree
    Refresh {
        /// Include untracked files
        #[arg(short, long)]
        all: bool,
    },
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        self.init_tracing();

        // Set up colored output
        if !self.cli.no_color {
            colored::control::set_override(true);
        } else {
            colored::control::set_override(false);
        }

        // Handle the command
        match self.handle_command().await {
            Ok(_) => Ok(()),
            Err(e) => {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
                exit(1);
            }
        }
    }

    fn init_tracing(&self) {
        let default_level = if self.cli.verbose { "debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("assetgit={0},source_control={0}", default_level)));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(self.cli.verbose)
            .try_init();
    }

    fn session_options(&self) -> SessionOptions {
        SessionOptions {
            git_binary: self.cli.git_binary.clone(),
            assume_yes: self.cli.yes,
            use_color: !self.cli.no_color,
        }
    }

    fn working_directory(&self) -> anyhow::Result<PathBuf> {
        let current_dir = env::current_dir()?;
        Ok(match &self.cli.directory {
            Some(dir) => current_dir.join(dir),
            None => current_dir,
        })
    }

    async fn handle_command(&self) -> anyhow::Result<()> {
        let directory = self.working_directory()?;
        let options = self.session_options();

        match &self.cli.command {
            Commands::Init { force } => InitCommand::new(*force, options).execute(&directory).await,
            Commands::Status => StatusCommand::new(options).execute(&directory).await,
            Commands::Changes { json } => {
                ChangesCommand::new(*json, options)
                    .execute(&directory)
                    .await
            }
            Commands::Sync { load_all } => {
                OperationCommand::new(OperationKind::Sync, *load_all, options)
                    .execute(&directory)
                    .await
            }
            Commands::Push => {
                OperationCommand::new(OperationKind::Push, false, options)
                    .execute(&directory)
                    .await
            }
            Commands::Revert { load_all } => {
                OperationCommand::new(OperationKind::Revert, *load_all, options)
                    .execute(&directory)
                    .await
            }
            Commands::Refresh { all } => {
                OperationCommand::new(
                    OperationKind::Refresh {
                        check_all_files: *all,
                    },
                    false,
                    options,
                )
                .execute(&directory)
                .await
            }
        }
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}
