//! Global command parsing.

/// A normalised line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the command list.
    Help,
    /// List carried items.
    Inventory,
    /// Save progress.
    Save,
    /// Restore saved progress.
    Load,
    /// Describe the current room again.
    Look,
    /// Leave the game (`quit` or `exit`).
    Quit,
    /// Anything else: a room-local action word.
    Action(String),
}

/// Every word recognised as a global command.
pub const GLOBAL_WORDS: [&str; 7] = ["help", "inventory", "save", "load", "look", "quit", "exit"];

/// Parse a line of input. Case and surrounding whitespace are ignored;
/// returns `None` for blank input.
pub fn parse_command(input: &str) -> Option<Command> {
    let word = input.trim().to_lowercase();
    let command = match word.as_str() {
        "" => return None,
        "help" => Command::Help,
        "inventory" => Command::Inventory,
        "save" => Command::Save,
        "load" => Command::Load,
        "look" => Command::Look,
        "quit" | "exit" => Command::Quit,
        _ => Command::Action(word),
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn globals() {
        assert_eq!(parse_command("help"), Some(Command::Help));
        assert_eq!(parse_command("  INVENTORY "), Some(Command::Inventory));
        assert_eq!(parse_command("Save"), Some(Command::Save));
        assert_eq!(parse_command("load"), Some(Command::Load));
        assert_eq!(parse_command("look"), Some(Command::Look));
    }

    #[test]
    fn quit_and_exit_are_synonyms() {
        assert_eq!(parse_command("quit"), Some(Command::Quit));
        assert_eq!(parse_command("EXIT"), Some(Command::Quit));
    }

    #[test]
    fn actions_are_lowercased() {
        assert_eq!(
            parse_command(" Bookshelf "),
            Some(Command::Action("bookshelf".into()))
        );
    }

    #[test]
    fn blank_is_none() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("   \t"), None);
    }
}
