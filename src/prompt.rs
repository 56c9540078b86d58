use std::io::{self, BufRead, Write};

/// Asks the user a yes/no question
pub trait Confirm: Send + Sync {
    fn confirm(&self, question: &str) -> io::Result<bool>;
}

/// Prompts on stdout and reads the answer from stdin
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, question: &str) -> io::Result<bool> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{question} [y/N]: ")?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;

        Ok(is_affirmative(&answer))
    }
}

/// A fixed answer, for non-interactive use
pub struct Answer(pub bool);

impl Confirm for Answer {
    fn confirm(&self, _question: &str) -> io::Result<bool> {
        Ok(self.0)
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_yes_in_any_case() {
        for answer in ["y", "Y", "yes", " YES\n", "Yes\r\n"] {
            assert!(is_affirmative(answer), "{answer:?}");
        }
    }

    #[test]
    fn anything_else_declines() {
        for answer in ["", "\n", "n", "no", "yep", "sure"] {
            assert!(!is_affirmative(answer), "{answer:?}");
        }
    }
}
