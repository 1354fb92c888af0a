use crate::utils::error::{ConsoleError, Result};
use std::io::{BufRead, Write};

/// What the user is asked before a destructive action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question<'a> {
    pub title: &'a str,
    pub message: &'a str,
    /// Extra line for actions that cannot be undone.
    pub warning: Option<&'a str>,
    /// Label of the confirming answer, e.g. "Clear database".
    pub action: &'a str,
}

/// Asks on stderr and reads the answer from stdin. `assume_yes` skips the
/// question entirely.
pub fn confirm(question: Question<'_>, assume_yes: bool) -> Result<()> {
    if assume_yes {
        tracing::debug!("Confirmation for '{}' skipped", question.title);
        return Ok(());
    }
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    confirm_with(&mut input, &mut std::io::stderr(), question)
}

pub fn confirm_with<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: Question<'_>,
) -> Result<()> {
    writeln!(output, "{}", question.title)?;
    writeln!(output, "{}", question.message)?;
    if let Some(warning) = question.warning {
        writeln!(output, "⚠️  {}", warning)?;
    }
    write!(output, "{}? [y/N] ", question.action)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Ok(()),
        _ => Err(ConsoleError::CancelledError {
            action: question.title.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn question(warning: Option<&'static str>) -> Question<'static> {
        Question {
            title: "Clear database",
            message: "Sure?",
            warning,
            action: "Clear database",
        }
    }

    #[test]
    fn yes_confirms() {
        let mut out = Vec::new();
        let result = confirm_with(&mut Cursor::new("Y\n"), &mut out, question(None));
        assert!(result.is_ok());
        assert!(String::from_utf8(out)
            .unwrap()
            .ends_with("Clear database? [y/N] "));
    }

    #[test]
    fn anything_else_cancels() {
        for answer in ["\n", "n\n", "nope\n", ""] {
            let result = confirm_with(
                &mut Cursor::new(answer),
                &mut Vec::new(),
                question(Some("Cannot be undone")),
            );
            assert!(matches!(result, Err(ConsoleError::CancelledError { .. })));
        }
    }

    #[test]
    fn warning_line_is_printed() {
        let mut out = Vec::new();
        let _ = confirm_with(&mut Cursor::new("n\n"), &mut out, question(Some("Irreversible")));
        assert!(String::from_utf8(out).unwrap().contains("Irreversible"));
    }
}
