//! Yes/no decisions for conflicts the options leave open.
use std::collections::VecDeque;
use std::io::{BufRead as _, Write as _};
use std::sync::Mutex;

/// Answers a yes/no question about a conflicting entry.
#[cfg_attr(test, mockall::automock)]
pub trait DecisionProvider: Send + Sync {
    /// Ask `question`; `true` means yes.
    fn confirm(&self, question: &str) -> bool;
}

/// Asks on stderr and reads the answer from stdin.
///
/// Only an answer starting with `y` or `Y` counts as yes; anything else,
/// end of input, or a read error is a no.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl DecisionProvider for TerminalPrompt {
    fn confirm(&self, question: &str) -> bool {
        let mut stderr = std::io::stderr().lock();
        if stderr
            .write_all(format!("{question} [y/N]: ").as_bytes())
            .and_then(|()| stderr.flush())
            .is_err()
        {
            return false;
        }
        drop(stderr);

        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_yes(&line),
        }
    }
}

/// Whether a typed answer means yes.
#[must_use]
pub fn is_yes(answer: &str) -> bool {
    answer.starts_with(['y', 'Y'])
}

/// Pre-seeded answers for non-interactive runs.
///
/// Answers are consumed in order; once they run out every question is
/// answered no. The questions asked are kept for inspection.
#[derive(Debug, Default)]
pub struct ScriptedDecisions {
    answers: Mutex<VecDeque<bool>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedDecisions {
    /// Provider that will answer with `answers`, in order.
    #[must_use]
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Every question asked so far.
    #[must_use]
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().map_or_else(|_| vec![], |g| g.clone())
    }
}

impl DecisionProvider for ScriptedDecisions {
    fn confirm(&self, question: &str) -> bool {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(question.to_string());
        }
        self.answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front())
            .unwrap_or(false)
    }
}
