pub mod command_runner;

pub use command_runner::{
    CommandOutput,
    CommandRunner,
    CommandRunnerError,
    CompletionEvent,
    CompletionReceiver,
    CompletionSender,
    DispatchError,
    GitCommandRunner,
};
