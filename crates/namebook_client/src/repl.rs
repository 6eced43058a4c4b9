//! Line commands for the interactive session.

use crate::state::DraftField;

pub const HELP: &str = "commands: first <value> | last <value> | submit | dismiss | reload | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Set(DraftField, String),
    Submit,
    Dismiss,
    Reload,
    Quit,
}

/// Parses one input line. Blank lines and unknown verbs yield `None`.
///
/// Field values keep everything after the verb, inner spaces included;
/// trimming is left to validation.
pub fn parse_command(line: &str) -> Option<ReplCommand> {
    let line = line.trim_start();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest),
        None => (line.trim_end(), ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "first" => Some(ReplCommand::Set(DraftField::FirstName, rest.to_string())),
        "last" => Some(ReplCommand::Set(DraftField::LastName, rest.to_string())),
        "submit" => Some(ReplCommand::Submit),
        "dismiss" => Some(ReplCommand::Dismiss),
        "reload" => Some(ReplCommand::Reload),
        "quit" | "exit" => Some(ReplCommand::Quit),
        _ => None,
    }
}
