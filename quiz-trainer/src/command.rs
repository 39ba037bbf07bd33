//! Command parsing for the quiz shell.
//!
//! Turns a line of user input into a [`Command`], validates id arguments and
//! offers completion over the command vocabulary. Nothing in here touches the
//! store; see [`crate::handlers`] for what each command does.

use thiserror::Error;

use crate::error::QuizError;

/// Every word the shell understands, aliases included.
pub const VOCABULARY: &[&str] = &[
    "h", "help", "list", "show", "add", "delete", "edit", "test", "p", "play", "credits", "q",
    "quit",
];

/// Commands that can be entered at the `quiz>` prompt.
///
/// Commands taking an id keep the raw argument text; it is validated with
/// [`parse_id`] by the handler so the error is reported like any other
/// command failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    List,
    Show(Option<String>),
    Add,
    Delete(Option<String>),
    Edit(Option<String>),
    Test(Option<String>),
    Play,
    Credits,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command: '{0}'")]
    Unknown(String),
}

impl Command {
    /// Parses a line of user input.
    ///
    /// Returns `Ok(None)` for a blank line. The first word is matched
    /// case-insensitively; only the word after it is kept as an argument,
    /// anything further is ignored.
    ///
    /// Syntax (aliases in parentheses):
    /// - `help` (`h`), `list`, `add`, `play` (`p`), `credits`, `quit` (`q`)
    /// - `show <id>`, `delete <id>`, `edit <id>`, `test <id>`
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let mut parts = line.split_whitespace();
        let Some(first) = parts.next() else {
            return Ok(None);
        };

        let name = first.trim().to_lowercase();
        let arg = parts.next().map(str::to_string);

        let command = match name.as_str() {
            "help" | "h" => Command::Help,
            "list" => Command::List,
            "show" => Command::Show(arg),
            "add" => Command::Add,
            "delete" => Command::Delete(arg),
            "edit" => Command::Edit(arg),
            "test" => Command::Test(arg),
            "play" | "p" => Command::Play,
            "credits" => Command::Credits,
            "quit" | "q" => Command::Quit,
            _ => return Err(ParseError::Unknown(name)),
        };
        Ok(Some(command))
    }
}

/// Validates the id argument shared by `show`, `delete`, `edit` and `test`.
///
/// Decimal input is accepted and truncated toward zero, so `"3.9"` is quiz 3.
pub fn parse_id(arg: Option<&str>) -> Result<i64, QuizError> {
    let text = arg.map(str::trim).ok_or(QuizError::MissingParameter)?;
    if let Ok(id) = text.parse::<i64>() {
        return Ok(id);
    }

    match text.parse::<f64>() {
        Ok(value) if value.is_finite() && value.abs() < i64::MAX as f64 => Ok(value.trunc() as i64),
        _ => Err(QuizError::NotANumber(text.to_string())),
    }
}

/// Vocabulary entries starting with `partial`, or the whole vocabulary when
/// none does.
pub fn complete(partial: &str) -> Vec<&'static str> {
    let hits: Vec<&'static str> = VOCABULARY
        .iter()
        .copied()
        .filter(|word| word.starts_with(partial))
        .collect();

    if hits.is_empty() {
        VOCABULARY.to_vec()
    } else {
        hits
    }
}
