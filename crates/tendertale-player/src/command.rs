//! Parsing of player input lines.

/// What the player asked for at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    /// Take the choice at this zero-based index.
    Choose(usize),
    /// Return to the previous scene.
    Back,
    /// Start over from the first scene.
    NewGame,
    /// Save progress.
    Save,
    /// Load saved progress.
    Load,
    /// Delete saved progress.
    Delete,
    /// Play or pause music.
    Music,
    /// Mute or unmute audio.
    Mute,
    /// Leave the player.
    Quit,
    /// An empty line: advance the dialogue.
    Continue,
    /// Anything else.
    Help,
}

impl PlayerCommand {
    /// Parses one input line. Choices are entered one-based.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Continue;
        }
        if let Ok(number) = line.parse::<usize>() {
            return number.checked_sub(1).map_or(Self::Help, Self::Choose);
        }
        match line.to_lowercase().as_str() {
            "b" | "back" => Self::Back,
            "n" | "new" => Self::NewGame,
            "s" | "save" => Self::Save,
            "l" | "load" => Self::Load,
            "d" | "delete" => Self::Delete,
            "m" | "mute" => Self::Mute,
            "p" | "play" | "music" => Self::Music,
            "q" | "quit" | "exit" => Self::Quit,
            _ => Self::Help,
        }
    }
}

/// Shown for [`PlayerCommand::Help`].
pub const HELP: &str = "Enter: continue | 1-9: choose | b: back | n: new game | s: save | \
l: load | d: delete save | m: mute | p: play/pause music | q: quit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_are_one_based_choices() {
        assert_eq!(PlayerCommand::parse("1"), PlayerCommand::Choose(0));
        assert_eq!(PlayerCommand::parse(" 3 \n"), PlayerCommand::Choose(2));
        assert_eq!(PlayerCommand::parse("0"), PlayerCommand::Help);
    }

    #[test]
    fn test_letters_and_words_map_to_actions() {
        assert_eq!(PlayerCommand::parse("b"), PlayerCommand::Back);
        assert_eq!(PlayerCommand::parse("SAVE"), PlayerCommand::Save);
        assert_eq!(PlayerCommand::parse("l"), PlayerCommand::Load);
        assert_eq!(PlayerCommand::parse("d"), PlayerCommand::Delete);
        assert_eq!(PlayerCommand::parse("n"), PlayerCommand::NewGame);
        assert_eq!(PlayerCommand::parse("m"), PlayerCommand::Mute);
        assert_eq!(PlayerCommand::parse("p"), PlayerCommand::Music);
        assert_eq!(PlayerCommand::parse("exit"), PlayerCommand::Quit);
    }

    #[test]
    fn test_blank_line_continues_and_unknown_asks_for_help() {
        assert_eq!(PlayerCommand::parse("   "), PlayerCommand::Continue);
        assert_eq!(PlayerCommand::parse("dance"), PlayerCommand::Help);
    }
}
