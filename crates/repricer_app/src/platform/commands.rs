/// Operator commands accepted on the console, one per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start`: greeting.
    Greet,
    /// `/parse`: start a run over the selected document.
    Parse,
    Stop,
    Status,
    /// `/setdoc <name>`; the name may contain spaces.
    SetDoc(String),
    /// `/setdoc` without a name.
    SetDocMissingName,
    GetDoc,
    ListDocs,
    Help,
    Quit,
    Unknown(String),
}

/// Parses one input line. Blank lines yield `None`. A leading `/` is optional
/// and the command word is case-insensitive.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let line = line.strip_prefix('/').unwrap_or(line);
    let mut parts = line.splitn(2, char::is_whitespace);
    let word = parts.next().filter(|word| !word.is_empty())?;
    let rest = parts.next().map(str::trim).unwrap_or_default();

    let command = match word.to_ascii_lowercase().as_str() {
        "start" => Command::Greet,
        "parse" => Command::Parse,
        "stop" => Command::Stop,
        "status" => Command::Status,
        "setdoc" if rest.is_empty() => Command::SetDocMissingName,
        "setdoc" => Command::SetDoc(collapse_spaces(rest)),
        "getdoc" => Command::GetDoc,
        "listdocs" => Command::ListDocs,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(word.to_string()),
    };
    Some(command)
}

/// Document names are re-joined with single spaces, as chat arguments are.
fn collapse_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::{parse_command, Command};

    #[test]
    fn slash_and_case_are_optional() {
        assert_eq!(parse_command("/parse"), Some(Command::Parse));
        assert_eq!(parse_command("PARSE"), Some(Command::Parse));
        assert_eq!(parse_command("  status  "), Some(Command::Status));
        assert_eq!(parse_command("/start"), Some(Command::Greet));
    }

    #[test]
    fn setdoc_keeps_multi_word_names() {
        assert_eq!(
            parse_command("/setdoc  Spring   price list "),
            Some(Command::SetDoc("Spring price list".to_string()))
        );
        assert_eq!(parse_command("/setdoc"), Some(Command::SetDocMissingName));
        assert_eq!(parse_command("/setdoc   "), Some(Command::SetDocMissingName));
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("   "), None);
        assert_eq!(parse_command("/"), None);
    }

    #[test]
    fn unknown_words_are_reported() {
        assert_eq!(
            parse_command("/reprice now"),
            Some(Command::Unknown("reprice".to_string()))
        );
        assert_eq!(parse_command("exit"), Some(Command::Quit));
    }
}
