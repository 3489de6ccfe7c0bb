//! Line dispatch for the terminal front end.
//!
//! A keyboard-wedge scanner types the decoded text followed by Enter, so a
//! line can be either a scan or an operator command. While scanning, every
//! non-empty line is a scan, verbatim. Commands start with `:` and are only
//! read while scanning is stopped.

/// Prefix that marks an operator command.
pub const COMMAND_PREFIX: char = ':';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Start,
    Stop,
    List,
    Export(Option<&'a str>),
    Csv(Option<&'a str>),
    Reset,
    Help,
    Quit,
    Unknown(&'a str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input<'a> {
    /// Decoded text to submit.
    Scan(&'a str),
    Command(Command<'a>),
    /// Empty line while scanning; stops the scanner.
    StopScanning,
    /// Non-command text while stopped.
    NotScanning,
    /// Empty line while stopped.
    Blank,
}

/// Classify one input line (without its line terminator).
pub fn parse_line(line: &str, scanning: bool) -> Input<'_> {
    if scanning {
        return if line.is_empty() {
            Input::StopScanning
        } else {
            Input::Scan(line)
        };
    }

    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Blank;
    }
    let Some(command) = trimmed.strip_prefix(COMMAND_PREFIX) else {
        return Input::NotScanning;
    };

    let mut words = command.split_whitespace();
    let name = words.next().unwrap_or("");
    let arg = words.next();
    Input::Command(match (name, arg) {
        ("start", None) => Command::Start,
        ("stop", None) => Command::Stop,
        ("list", None) => Command::List,
        ("export", path) => Command::Export(path),
        ("csv", path) => Command::Csv(path),
        ("reset", None) => Command::Reset,
        ("help", None) => Command::Help,
        ("q", None) | ("quit", None) => Command::Quit,
        _ => Command::Unknown(trimmed),
    })
}
