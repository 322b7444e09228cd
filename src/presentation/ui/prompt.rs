use colored::Colorize;
use console::Term;
use tracing::{debug, warn};

/// Answer to a blocking confirmation dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptChoice {
    Ok,
    Cancel,
}

impl PromptChoice {
    pub fn is_ok(self) -> bool {
        self == PromptChoice::Ok
    }
}

/// Synchronous OK/Cancel confirmation shown to the user
#[cfg_attr(test, mockall::automock)]
pub trait UserPrompt: Send + Sync {
    fn confirm(&self, message: &str) -> PromptChoice;
}

/// Terminal implementation of [`UserPrompt`].
///
/// Without an attached terminal every dialog is answered with Cancel unless
/// `assume_yes` is set.
pub struct TerminalPrompt {
    terminal: Term,
    assume_yes: bool,
    use_color: bool,
}

impl TerminalPrompt {
    pub fn new(assume_yes: bool, use_color: bool) -> Self {
        Self {
            terminal: Term::stderr(),
            assume_yes,
            use_color,
        }
    }

    fn question(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {} [y/N]: ", "?".yellow().bold(), message)
        } else {
            format!("[CONFIRM] {} [y/N]: ", message)
        }
    }
}

impl UserPrompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> PromptChoice {
        if self.assume_yes {
            debug!("Auto-confirmed: {}", message);
            return PromptChoice::Ok;
        }

        if !self.terminal.is_term() {
            warn!(target: "source_control", "No terminal to confirm '{}', cancelling", message);
            return PromptChoice::Cancel;
        }

        if let Err(e) = self.terminal.write_str(&self.question(message)) {
            warn!("Failed to show prompt: {}", e);
            return PromptChoice::Cancel;
        }

        match self.terminal.read_line() {
            Ok(input) => parse_answer(&input),
            Err(e) => {
                warn!("Failed to read answer: {}", e);
                PromptChoice::Cancel
            }
        }
    }
}

fn parse_answer(input: &str) -> PromptChoice {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" | "ok" => PromptChoice::Ok,
        _ => PromptChoice::Cancel,
    }
}
