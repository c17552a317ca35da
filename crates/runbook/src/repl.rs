//! Parsing for the interactive prompt.

use std::path::PathBuf;

/// One action entered at the prompt. Indices are zero-based here; the
/// prompt displays and accepts one-based positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    List,
    Add,
    Edit(usize),
    Delete(usize),
    Run(usize),
    RunInNew(usize),
    ToggleAutoRun,
    Refresh,
    Open(PathBuf),
    Help,
    Quit,
}

/// Parse a prompt line. Returns a user-facing message for anything
/// unrecognized.
pub fn parse(line: &str) -> Result<ReplCommand, String> {
    let mut parts = line.split_whitespace();
    let Some(keyword) = parts.next() else {
        return Err("Type a command, or 'help'".to_string());
    };
    let rest = parts.collect::<Vec<_>>();

    match keyword {
        "list" | "ls" => Ok(ReplCommand::List),
        "add" | "a" => Ok(ReplCommand::Add),
        "edit" | "e" => indexed(ReplCommand::Edit, "edit", &rest),
        "delete" | "del" | "d" => indexed(ReplCommand::Delete, "delete", &rest),
        "run" | "r" => indexed(ReplCommand::Run, "run", &rest),
        "new" | "n" => indexed(ReplCommand::RunInNew, "new", &rest),
        "autorun" => Ok(ReplCommand::ToggleAutoRun),
        "refresh" => Ok(ReplCommand::Refresh),
        "open" => match rest.as_slice() {
            [path] => Ok(ReplCommand::Open(PathBuf::from(path))),
            _ => Err("Usage: open <directory>".to_string()),
        },
        "help" | "h" | "?" => Ok(ReplCommand::Help),
        "quit" | "q" | "exit" => Ok(ReplCommand::Quit),
        other => Err(format!("Unknown command '{}'; type 'help'", other)),
    }
}

fn indexed(
    build: impl FnOnce(usize) -> ReplCommand,
    name: &str,
    rest: &[&str],
) -> Result<ReplCommand, String> {
    let [raw] = rest else {
        return Err(format!("Usage: {} <number>", name));
    };
    match raw.parse::<usize>() {
        Ok(position) if position >= 1 => Ok(build(position - 1)),
        _ => Err(format!("'{}' is not a valid list position", raw)),
    }
}
