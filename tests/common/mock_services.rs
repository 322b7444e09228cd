//! Mock services for testing
//!
//! Scripted and recording implementations of the collaborator traits the
//! orchestration layer is built on.

use assetgit::domain::entities::operation_state::ProgressToken;
use assetgit::domain::entities::repository_handle::RepositoryHandle;
use assetgit::domain::value_objects::operation_kind::OperationKind;
use assetgit::infrastructure::process::command_runner::{
    CommandOutput, CommandRunner, CompletionEvent, CompletionSender, DispatchError,
};
use assetgit::presentation::ui::feedback::Feedback;
use assetgit::presentation::ui::prompt::{PromptChoice, UserPrompt};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// What the scripted runner does when an operation is submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitBehavior {
    /// Send a completion event with this result right away
    Complete(bool),
    /// Keep the sender; the test completes the operation with `finish`
    Hold,
    /// Refuse the submission
    Reject,
}

type SubmitHook = Box<dyn Fn(OperationKind) + Send + Sync>;

/// Command runner answering from a script keyed by the full command line
pub struct ScriptedCommandRunner {
    responses: Mutex<HashMap<String, CommandOutput>>,
    call_history: Arc<Mutex<Vec<String>>>,
    submitted: Arc<Mutex<Vec<OperationKind>>>,
    held: Mutex<Vec<(OperationKind, CompletionSender)>>,
    behavior: Mutex<SubmitBehavior>,
    on_submit: Mutex<Option<SubmitHook>>,
}

impl ScriptedCommandRunner {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            call_history: Arc::new(Mutex::new(Vec::new())),
            submitted: Arc::new(Mutex::new(Vec::new())),
            held: Mutex::new(Vec::new()),
            behavior: Mutex::new(SubmitBehavior::Complete(true)),
            on_submit: Mutex::new(None),
        }
    }

    /// Answer `command_line` (e.g. `"stash pop"`) with `lines` on stdout
    pub fn respond(&self, command_line: &str, lines: &[&str]) {
        self.responses.lock().unwrap().insert(
            command_line.to_string(),
            CommandOutput::success(lines.iter().map(|l| l.to_string()).collect()),
        );
    }

    /// Make `command_line` fail
    pub fn fail(&self, command_line: &str) {
        self.responses.lock().unwrap().insert(
            command_line.to_string(),
            CommandOutput::failure(vec![format!("error: {} failed", command_line)]),
        );
    }

    pub fn set_behavior(&self, behavior: SubmitBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    /// Run `hook` when an operation is submitted, standing in for git's effect on disk
    pub fn on_submit(&self, hook: impl Fn(OperationKind) + Send + Sync + 'static) {
        *self.on_submit.lock().unwrap() = Some(Box::new(hook));
    }

    /// Send the completion of the oldest held operation
    pub fn finish(&self, succeeded: bool) -> bool {
        let mut held = self.held.lock().unwrap();
        if held.is_empty() {
            return false;
        }
        let (operation, sender) = held.remove(0);
        sender
            .send(CompletionEvent {
                operation,
                succeeded,
            })
            .is_ok()
    }

    pub fn get_call_history(&self) -> Vec<String> {
        self.call_history.lock().unwrap().clone()
    }

    pub fn count_calls(&self, command_line: &str) -> usize {
        self.call_history
            .lock()
            .unwrap()
            .iter()
            .filter(|call| *call == command_line)
            .count()
    }

    pub fn submitted(&self) -> Vec<OperationKind> {
        self.submitted.lock().unwrap().clone()
    }
}

impl Default for ScriptedCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for ScriptedCommandRunner {
    async fn run(
        &self,
        _repository: &RepositoryHandle,
        command: &str,
        args: &[String],
        _input: &[String],
    ) -> CommandOutput {
        let command_line = if args.is_empty() {
            command.to_string()
        } else {
            format!("{} {}", command, args.join(" "))
        };
        self.call_history.lock().unwrap().push(command_line.clone());
        self.responses
            .lock()
            .unwrap()
            .get(&command_line)
            .cloned()
            .unwrap_or_else(|| CommandOutput::success(Vec::new()))
    }

    fn submit(
        &self,
        _repository: &RepositoryHandle,
        operation: OperationKind,
        completions: CompletionSender,
    ) -> Result<(), DispatchError> {
        let behavior = *self.behavior.lock().unwrap();
        if behavior == SubmitBehavior::Reject {
            return Err(DispatchError::Rejected {
                operation: operation.name().to_string(),
                message: "scripted rejection".to_string(),
            });
        }

        self.submitted.lock().unwrap().push(operation);
        if let Some(hook) = self.on_submit.lock().unwrap().as_ref() {
            hook(operation);
        }

        match behavior {
            SubmitBehavior::Complete(succeeded) => {
                let _ = completions.send(CompletionEvent {
                    operation,
                    succeeded,
                });
            }
            SubmitBehavior::Hold => self.held.lock().unwrap().push((operation, completions)),
            SubmitBehavior::Reject => unreachable!(),
        }
        Ok(())
    }
}

/// Prompt answering from a queue (OK once the queue is empty)
#[derive(Default)]
pub struct RecordingPrompt {
    answers: Mutex<VecDeque<PromptChoice>>,
    questions: Mutex<Vec<String>>,
}

impl RecordingPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering(answers: &[PromptChoice]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

impl UserPrompt for RecordingPrompt {
    fn confirm(&self, message: &str) -> PromptChoice {
        self.questions.lock().unwrap().push(message.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(PromptChoice::Ok)
    }
}

/// Feedback recording everything shown to the user
#[derive(Default)]
pub struct RecordingFeedback {
    next_token: Mutex<u64>,
    active: Mutex<Vec<ProgressToken>>,
    progress_messages: Mutex<Vec<String>>,
    results: Mutex<Vec<(String, bool)>>,
    warnings: Mutex<Vec<String>>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_progress(&self) -> usize {
        self.active.lock().unwrap().len()
    }

    pub fn progress_messages(&self) -> Vec<String> {
        self.progress_messages.lock().unwrap().clone()
    }

    pub fn results(&self) -> Vec<(String, bool)> {
        self.results.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }
}

impl Feedback for RecordingFeedback {
    fn show_progress(&self, message: &str) -> ProgressToken {
        let mut next = self.next_token.lock().unwrap();
        *next += 1;
        let token = ProgressToken(*next);
        self.active.lock().unwrap().push(token);
        self.progress_messages
            .lock()
            .unwrap()
            .push(message.to_string());
        token
    }

    fn clear_progress(&self, token: ProgressToken) {
        self.active.lock().unwrap().retain(|t| *t != token);
    }

    fn show_result(&self, operation_name: &str, succeeded: bool) {
        self.results
            .lock()
            .unwrap()
            .push((operation_name.to_string(), succeeded));
    }

    fn notify_warning(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }
}
