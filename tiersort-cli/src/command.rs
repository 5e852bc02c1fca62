/// Parsing of interactive input lines into commands.
use std::path::PathBuf;
use tiersort_core::{resolve_topic, Direction, Tier};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Start placing a random unranked item.
    Next,
    /// `b`, `b+` (lean better) or `b-` (lean worse).
    Tier(Tier, Direction),
    /// Answer a comparison. The direction says where the shown entry sits
    /// relative to the subject: better is `PreferHigher`, meaning the
    /// subject belongs after it.
    Compare(Direction),
    /// A topic number (`0`..`27`) or name.
    Topic(String),
    WhoAmI,
    List(Option<Tier>),
    Delete,
    Save,
    Restore(PathBuf),
    Help,
    Quit,
    Unknown(String),
}

/// Parse one input line. Returns `None` for a blank line.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let lowered = word.to_ascii_lowercase();

    let command = match lowered.as_str() {
        "next" | "n" => Command::Next,
        "+" | "better" => Command::Compare(Direction::PreferHigher),
        "-" | "worse" => Command::Compare(Direction::PreferLower),
        "whoami" | "w" => Command::WhoAmI,
        "list" | "ls" => match rest {
            "" => Command::List(None),
            symbol => match symbol.parse() {
                Ok(tier) => Command::List(Some(tier)),
                Err(_) => Command::Unknown(line.to_string()),
            },
        },
        "delete" => Command::Delete,
        "exit" | "save" | "download" => Command::Save,
        "restore" | "import" if !rest.is_empty() => Command::Restore(PathBuf::from(rest)),
        "help" | "h" => Command::Help,
        "quit" | "q" => Command::Quit,
        _ => parse_tier(&lowered)
            .map(|(tier, direction)| Command::Tier(tier, direction))
            .or_else(|| resolve_topic(line).map(|_| Command::Topic(line.to_string())))
            .unwrap_or_else(|| Command::Unknown(word.to_string())),
    };
    Some(command)
}

fn parse_tier(word: &str) -> Option<(Tier, Direction)> {
    let (symbol, direction) = match word.chars().last()? {
        '+' => (&word[..word.len() - 1], Direction::PreferLower),
        '-' => (&word[..word.len() - 1], Direction::PreferHigher),
        _ => (word, Direction::Equal),
    };
    if symbol.chars().count() != 1 {
        return None;
    }
    symbol.parse().ok().map(|tier| (tier, direction))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_are_ignored() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("   \t"), None);
    }

    #[test]
    fn test_tier_commands() {
        assert_eq!(parse_command("b"), Some(Command::Tier(Tier::B, Direction::Equal)));
        assert_eq!(parse_command("s+"), Some(Command::Tier(Tier::S, Direction::PreferLower)));
        assert_eq!(parse_command("F-"), Some(Command::Tier(Tier::F, Direction::PreferHigher)));
        assert_eq!(parse_command("x+"), Some(Command::Unknown("x+".into())));
    }

    #[test]
    fn test_compare_commands() {
        assert_eq!(parse_command("+"), Some(Command::Compare(Direction::PreferHigher)));
        assert_eq!(parse_command("better"), Some(Command::Compare(Direction::PreferHigher)));
        assert_eq!(parse_command("-"), Some(Command::Compare(Direction::PreferLower)));
        assert_eq!(parse_command("worse"), Some(Command::Compare(Direction::PreferLower)));
    }

    #[test]
    fn test_topic_by_number_and_name() {
        assert_eq!(parse_command("23"), Some(Command::Topic("23".into())));
        assert_eq!(parse_command("physics"), Some(Command::Topic("physics".into())));
        assert_eq!(parse_command("28"), Some(Command::Unknown("28".into())));
    }

    #[test]
    fn test_list_with_and_without_tier() {
        assert_eq!(parse_command("ls"), Some(Command::List(None)));
        assert_eq!(parse_command("list a"), Some(Command::List(Some(Tier::A))));
        assert_eq!(parse_command("list z"), Some(Command::Unknown("list z".into())));
    }

    #[test]
    fn test_aliases() {
        assert_eq!(parse_command("n"), Some(Command::Next));
        assert_eq!(parse_command("w"), Some(Command::WhoAmI));
        assert_eq!(parse_command("download"), Some(Command::Save));
        assert_eq!(parse_command("exit"), Some(Command::Save));
        assert_eq!(parse_command("h"), Some(Command::Help));
        assert_eq!(parse_command("q"), Some(Command::Quit));
        assert_eq!(parse_command("delete"), Some(Command::Delete));
    }

    #[test]
    fn test_restore_needs_a_path() {
        assert_eq!(
            parse_command("restore  backups/old.json "),
            Some(Command::Restore(PathBuf::from("backups/old.json")))
        );
        assert_eq!(parse_command("restore"), Some(Command::Unknown("restore".into())));
    }

    #[test]
    fn test_unknown_word() {
        assert_eq!(parse_command("dance now"), Some(Command::Unknown("dance".into())));
    }
}
