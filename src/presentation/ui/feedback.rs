use crate::domain::entities::operation_state::ProgressToken;
use colored::Colorize;
use console::Term;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{error, info, warn};

/// Progress, result and warning notifications shown to the user
pub trait Feedback: Send + Sync {
    /// Display an in-progress indicator; the token identifies it for removal
    fn show_progress(&self, message: &str) -> ProgressToken;

    fn clear_progress(&self, token: ProgressToken);

    /// Report the outcome of a finished operation
    fn show_result(&self, operation_name: &str, succeeded: bool);

    /// Transient warning notification
    fn notify_warning(&self, message: &str);
}

/// Result line for a finished operation
pub fn result_message(operation_name: &str, succeeded: bool) -> String {
    if succeeded {
        format!("{} operation was successful!", operation_name)
    } else {
        format!("Error: {} operation failed!", operation_name)
    }
}

fn spinner_template(use_color: bool) -> &'static str {
    if use_color {
        "{spinner:.green} {msg}"
    } else {
        "{spinner} {msg}"
    }
}

/// Terminal implementation of [`Feedback`] built on indicatif spinners
pub struct TerminalFeedback {
    use_color: bool,
    show_spinner: bool,
    next_token: AtomicU64,
    spinners: Mutex<HashMap<ProgressToken, ProgressBar>>,
}

impl TerminalFeedback {
    /// Spinners are shown whenever stderr is a terminal, colored or not
    pub fn new(use_color: bool) -> Self {
        Self::with_spinner(use_color, Term::stderr().is_term())
    }

    pub fn with_spinner(use_color: bool, show_spinner: bool) -> Self {
        Self {
            use_color,
            show_spinner,
            next_token: AtomicU64::new(1),
            spinners: Mutex::new(HashMap::new()),
        }
    }

    pub fn shows_spinner(&self) -> bool {
        self.show_spinner
    }

    fn create_spinner(&self, message: &str) -> ProgressBar {
        if !self.show_spinner {
            // Redirected output gets a single line instead of spinner frames
            eprintln!("[INFO] {}", message);
            let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden());
            pb.set_message(message.to_string());
            return pb;
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_strings(&["⠁", "⠂", "⠄", "⡀", "⢀", "⠠", "⠐", "⠈"])
            .template(spinner_template(self.use_color))
        {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(120));
        pb.set_message(message.to_string());
        pb
    }

    /// Number of in-progress indicators currently displayed
    pub fn active_progress_count(&self) -> usize {
        self.spinners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Feedback for TerminalFeedback {
    fn show_progress(&self, message: &str) -> ProgressToken {
        let token = ProgressToken(self.next_token.fetch_add(1, Ordering::Relaxed));
        let spinner = self.create_spinner(message);
        self.spinners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token, spinner);
        token
    }

    fn clear_progress(&self, token: ProgressToken) {
        let spinner = self
            .spinners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&token);
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
    }

    fn show_result(&self, operation_name: &str, succeeded: bool) {
        let message = result_message(operation_name, succeeded);
        if succeeded {
            info!(target: "source_control", "{}", message);
            if self.use_color {
                println!("{} {}", "✓".green().bold(), message);
            } else {
                println!("[SUCCESS] {}", message);
            }
        } else {
            error!(target: "source_control", "{}", message);
            if self.use_color {
                eprintln!("{} {}", "✗".red().bold(), message);
            } else {
                eprintln!("[ERROR] {}", message);
            }
        }
    }

    fn notify_warning(&self, message: &str) {
        warn!(target: "source_control", "{}", message);
        if self.use_color {
            eprintln!("{} {}", "⚠".yellow().bold(), message);
        } else {
            eprintln!("[WARNING] {}", message);
        }
    }
}
