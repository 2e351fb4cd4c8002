//! Confirmation gate for live runs.

use std::io::{BufRead, Write};

/// Asks for an explicit go-ahead before anything is written.
pub trait Confirm {
    /// Return `true` only on an affirmative answer.
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Accepts without asking (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, prompt: &str) -> bool {
        tracing::debug!("confirmation assumed: {prompt}");
        true
    }
}

/// Reads one line of `y`/`n` from a reader after writing the prompt.
///
/// Only `y` (any case, surrounding whitespace ignored) is affirmative. End
/// of input and read errors count as a refusal.
#[derive(Debug)]
pub struct LineConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConfirm<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl LineConfirm<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Prompt on stderr, read from stdin.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> Confirm for LineConfirm<R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        if let Err(error) = write!(self.output, "{prompt} (y/N): ").and_then(|()| self.output.flush())
        {
            tracing::warn!(%error, "failed to write confirmation prompt");
            return false;
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(_) => is_affirmative(&answer),
            Err(error) => {
                tracing::warn!(%error, "failed to read confirmation");
                false
            }
        }
    }
}

#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("y\n", true)]
    #[case("Y\n", true)]
    #[case("  y  \n", true)]
    #[case("yes\n", false)]
    #[case("n\n", false)]
    #[case("\n", false)]
    #[case("", false)]
    fn line_answers(#[case] input: &str, #[case] expected: bool) {
        let mut output = Vec::new();
        let mut confirm = LineConfirm::new(Cursor::new(input.as_bytes()), &mut output);
        assert_eq!(confirm.confirm("Proceed?"), expected);
        drop(confirm);
        assert_eq!(String::from_utf8(output).unwrap(), "Proceed? (y/N): ");
    }

    #[test]
    fn closures_confirm() {
        let mut asked = Vec::new();
        let mut confirm = |prompt: &str| {
            asked.push(prompt.to_string());
            false
        };
        assert!(!Confirm::confirm(&mut confirm, "go?"));
        assert_eq!(asked, vec!["go?"]);
    }
}
