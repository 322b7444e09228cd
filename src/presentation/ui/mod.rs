/// User interaction surfaces used by the orchestration layer
pub mod feedback;
pub mod prompt;

pub use feedback::{result_message, Feedback, TerminalFeedback};
pub use prompt::{PromptChoice, TerminalPrompt, UserPrompt};
