use crate::domain::entities::repository_handle::RepositoryHandle;
use crate::domain::value_objects::operation_kind::OperationKind;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Line-oriented result of one VCS command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub ok: bool,
    pub stdout_lines: Vec<String>,
    pub stderr_lines: Vec<String>,
}

impl CommandOutput {
    pub fn success(stdout_lines: Vec<String>) -> Self {
        Self {
            ok: true,
            stdout_lines,
            stderr_lines: Vec::new(),
        }
    }

    pub fn failure(stderr_lines: Vec<String>) -> Self {
        Self {
            ok: false,
            stdout_lines: Vec::new(),
            stderr_lines,
        }
    }
}

/// Single event produced when an asynchronously dispatched operation finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionEvent {
    pub operation: OperationKind,
    pub succeeded: bool,
}

impl CompletionEvent {
    pub fn operation_name(&self) -> &'static str {
        self.operation.name()
    }
}

pub type CompletionSender = mpsc::UnboundedSender<CompletionEvent>;
pub type CompletionReceiver = mpsc::UnboundedReceiver<CompletionEvent>;

/// Errors raised while spawning VCS processes
#[derive(Debug, thiserror::Error)]
pub enum CommandRunnerError {
    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised when an operation cannot be submitted for asynchronous execution
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("No async runtime available to run {operation}")]
    NoRuntime { operation: String },

    #[error("Completion channel closed, cannot run {operation}")]
    RunnerShutDown { operation: String },

    #[error("{operation} rejected by command runner: {message}")]
    Rejected { operation: String, message: String },
}

impl DispatchError {
    pub fn operation(&self) -> &str {
        match self {
            DispatchError::NoRuntime { operation }
            | DispatchError::RunnerShutDown { operation }
            | DispatchError::Rejected { operation, .. } => operation,
        }
    }
}

/// Executes the VCS binary against a working tree.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run one command to completion. Failures to spawn are reported as `ok == false`.
    async fn run(
        &self,
        repository: &RepositoryHandle,
        command: &str,
        args: &[String],
        input: &[String],
    ) -> CommandOutput;

    /// Start `operation` in the background. Exactly one [`CompletionEvent`] is
    /// sent on `completions` once it finishes; nothing is sent when this returns `Err`.
    fn submit(
        &self,
        repository: &RepositoryHandle,
        operation: OperationKind,
        completions: CompletionSender,
    ) -> Result<(), DispatchError>;
}

/// Git implementation of [`CommandRunner`] built on `tokio::process`
#[derive(Debug, Clone, Default)]
pub struct GitCommandRunner;

impl GitCommandRunner {
    pub fn new() -> Self {
        Self
    }

    /// Execute a git command in the repository root
    async fn execute(
        repository: &RepositoryHandle,
        command: &str,
        args: &[String],
        input: &[String],
    ) -> Result<CommandOutput, CommandRunnerError> {
        let mut cmd = Command::new(repository.binary_path());
        cmd.arg(command)
            .args(args)
            .current_dir(repository.root())
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(if input.is_empty() {
                Stdio::null()
            } else {
                Stdio::piped()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let command_line = format!(
            "{} {} {}",
            repository.binary_path().display(),
            command,
            args.join(" ")
        );
        debug!(target: "source_control", "Running: {}", command_line.trim_end());

        let mut child = cmd.spawn().map_err(|source| CommandRunnerError::Spawn {
            command: command_line.clone(),
            source,
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            let mut payload = input.join("\n");
            payload.push('\n');
            stdin
                .write_all(payload.as_bytes())
                .await
                .map_err(|source| CommandRunnerError::Spawn {
                    command: command_line.clone(),
                    source,
                })?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| CommandRunnerError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        Ok(CommandOutput {
            ok: output.status.success(),
            stdout_lines: split_lines(&output.stdout),
            stderr_lines: split_lines(&output.stderr),
        })
    }

    /// Commands run, in order, for an asynchronously dispatched operation
    pub fn operation_commands(
        repository: &RepositoryHandle,
        operation: OperationKind,
    ) -> Vec<(&'static str, Vec<String>)> {
        match operation {
            OperationKind::Sync => {
                let mut args = vec!["--rebase".to_string()];
                if let Some(branch) = repository.branch() {
                    args.push(repository.remote().to_string());
                    args.push(branch.to_string());
                }
                vec![("pull", args)]
            }
            OperationKind::Push => vec![(
                "push",
                vec![
                    "--set-upstream".to_string(),
                    repository.remote().to_string(),
                    "HEAD".to_string(),
                ],
            )],
            OperationKind::Revert => {
                vec![("reset", vec!["--hard".to_string(), "HEAD".to_string()])]
            }
            OperationKind::Refresh { check_all_files } => {
                let untracked = if check_all_files {
                    "--untracked-files=all"
                } else {
                    "--untracked-files=no"
                };
                vec![(
                    "status",
                    vec!["--porcelain".to_string(), untracked.to_string()],
                )]
            }
        }
    }
}

fn split_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl CommandRunner for GitCommandRunner {
    async fn run(
        &self,
        repository: &RepositoryHandle,
        command: &str,
        args: &[String],
        input: &[String],
    ) -> CommandOutput {
        match Self::execute(repository, command, args, input).await {
            Ok(output) => output,
            Err(e) => {
                warn!(target: "source_control", "{}", e);
                CommandOutput::failure(vec![e.to_string()])
            }
        }
    }

    fn submit(
        &self,
        repository: &RepositoryHandle,
        operation: OperationKind,
        completions: CompletionSender,
    ) -> Result<(), DispatchError> {
        if completions.is_closed() {
            return Err(DispatchError::RunnerShutDown {
                operation: operation.name().to_string(),
            });
        }
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| DispatchError::NoRuntime {
            operation: operation.name().to_string(),
        })?;

        let repository = repository.clone();
        runtime.spawn(async move {
            let mut succeeded = true;
            for (command, args) in Self::operation_commands(&repository, operation) {
                let output = match Self::execute(&repository, command, &args, &[]).await {
                    Ok(output) => output,
                    Err(e) => CommandOutput::failure(vec![e.to_string()]),
                };
                for line in &output.stderr_lines {
                    debug!(target: "source_control", "{}: {}", operation, line);
                }
                if !output.ok {
                    warn!(
                        target: "source_control",
                        "{} failed during '{}': {}",
                        operation,
                        command,
                        output.stderr_lines.join("; ")
                    );
                    succeeded = false;
                    break;
                }
            }

            info!(target: "source_control", "{} finished (succeeded: {})", operation, succeeded);
            // The controller may already be gone when the process outlives it.
            let _ = completions.send(CompletionEvent {
                operation,
                succeeded,
            });
        });

        Ok(())
    }
}
