use dialoguer::Confirm;
use std::collections::VecDeque;
use std::io::BufRead;

/// Yes/no confirmation source injected into the orchestrator so destructive
/// gates can be scripted in tests.
pub trait Confirmer {
    fn confirm(&mut self, message: &str, default: bool) -> bool;
}

/// Confirms on the terminal, honoring the auto-confirm flag.
pub struct TerminalConfirmer {
    auto_confirm: bool,
}

impl TerminalConfirmer {
    pub fn new(auto_confirm: bool) -> Self {
        Self { auto_confirm }
    }
}

impl Confirmer for TerminalConfirmer {
    fn confirm(&mut self, message: &str, default: bool) -> bool {
        if self.auto_confirm {
            println!("{} [auto-confirmed]", message);
            return true;
        }

        if console::user_attended() {
            Confirm::new()
                .with_prompt(message)
                .default(default)
                .interact()
                .unwrap_or(false)
        } else {
            let hint = if default { "(Y/n)" } else { "(y/N)" };
            println!("{} {}", message, hint);

            let stdin = std::io::stdin();
            let mut line = String::new();
            if stdin.lock().read_line(&mut line).is_err() {
                return false;
            }
            let answer = line.trim().to_lowercase();
            if answer.is_empty() {
                default
            } else {
                matches!(answer.as_str(), "y" | "yes")
            }
        }
    }
}

/// Answers confirmations from a fixed script; exhausting the script
/// declines.
pub struct ScriptedConfirmer {
    answers: VecDeque<bool>,
}

impl ScriptedConfirmer {
    pub fn new(answers: Vec<bool>) -> Self {
        Self {
            answers: answers.into(),
        }
    }
}

impl Confirmer for ScriptedConfirmer {
    fn confirm(&mut self, _message: &str, _default: bool) -> bool {
        self.answers.pop_front().unwrap_or(false)
    }
}
