//! Scene document model.
//!
//! Scenes arrive from the backend as JSON. A scene is immutable once
//! fetched; the next scene replaces it rather than mutating it.

use std::fmt;

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// One unit of narrative content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene identifier, unique within a story.
    pub id: String,
    /// Background image asset name.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub background: Option<String>,
    /// Characters on screen when the scene opens.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub characters: Vec<Character>,
    /// The scene script, consumed strictly in order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dialogue: Vec<DialogueEntry>,
    /// Branches offered once the dialogue is exhausted.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub choices: Vec<Choice>,
}

impl Scene {
    /// Creates an empty scene with the given id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            background: None,
            characters: Vec::new(),
            dialogue: Vec::new(),
            choices: Vec::new(),
        }
    }

    /// Number of spoken lines in the script (commands excluded).
    #[must_use]
    pub fn text_line_count(&self) -> usize {
        self.dialogue
            .iter()
            .filter(|entry| matches!(entry, DialogueEntry::Line(_)))
            .count()
    }
}

/// A character sprite placed on stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Name used by commands to address this character.
    pub name: String,
    /// Sprite asset name.
    pub sprite: String,
    /// Stage position.
    #[serde(default)]
    pub position: Position,
}

impl Character {
    /// Creates a character at the given position.
    #[must_use]
    pub fn new(name: impl Into<String>, sprite: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            sprite: sprite.into(),
            position,
        }
    }
}

/// Horizontal stage slot. Unknown positions are kept verbatim so authors can
/// introduce new layout classes without a model change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Position {
    /// Left third of the stage.
    Left,
    /// Stage centre.
    #[default]
    Center,
    /// Right third of the stage.
    Right,
    /// Any other author-defined slot.
    Other(String),
}

impl From<String> for Position {
    fn from(value: String) -> Self {
        match value.as_str() {
            "left" => Self::Left,
            "center" => Self::Center,
            "right" => Self::Right,
            _ => Self::Other(value),
        }
    }
}

impl From<Position> for String {
    fn from(value: Position) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Center => f.write_str("center"),
            Self::Right => f.write_str("right"),
            Self::Other(slot) => f.write_str(slot),
        }
    }
}

/// One entry of a scene script: spoken text or a stage command.
///
/// Commands carry a `"command"` tag on the wire; anything without one is a
/// text line. A tagged entry never becomes a line: a command whose fields do
/// not parse is logged and read as [`StageCommand::Unsupported`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DialogueEntry {
    /// A stage instruction.
    Command(StageCommand),
    /// A spoken line.
    Line(TextLine),
}

impl<'de> Deserialize<'de> for DialogueEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let Some(tag) = value.get("command").cloned() else {
            return TextLine::deserialize(value)
                .map(Self::Line)
                .map_err(de::Error::custom);
        };
        match StageCommand::deserialize(value) {
            Ok(command) => Ok(Self::Command(command)),
            Err(e) => {
                warn!(command = %tag, error = %e, "malformed stage command, skipping it");
                Ok(Self::Command(StageCommand::Unsupported))
            }
        }
    }
}

impl DialogueEntry {
    /// Builds a text line entry.
    #[must_use]
    pub fn line(speaker: Option<&str>, text: impl Into<String>) -> Self {
        Self::Line(TextLine {
            speaker: speaker.map(str::to_owned),
            text: text.into(),
        })
    }
}

/// A spoken line of dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLine {
    /// Who is speaking; narration when absent.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub speaker: Option<String>,
    /// The text to type out.
    #[serde(default)]
    pub text: String,
}

/// A non-text instruction embedded in the script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum StageCommand {
    /// Swap the sprite of a character already on stage.
    ChangeSprite {
        /// Target character name.
        character: String,
        /// New sprite asset name.
        sprite: String,
    },
    /// Put a new character on stage.
    AddCharacter {
        /// The character to add.
        character: Character,
    },
    /// Take a character off stage.
    RemoveCharacter {
        /// Target character name.
        character_name: String,
    },
    /// A command this client does not understand.
    #[serde(other)]
    Unsupported,
}

impl StageCommand {
    /// Wire name of the command, used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ChangeSprite { .. } => "change_sprite",
            Self::AddCharacter { .. } => "add_character",
            Self::RemoveCharacter { .. } => "remove_character",
            Self::Unsupported => "unsupported",
        }
    }
}

/// A branch offered at the end of a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Label shown to the player.
    pub text: String,
    /// Scene requested when this choice is taken.
    pub next_scene: String,
}

impl Choice {
    /// Creates a choice.
    #[must_use]
    pub fn new(text: impl Into<String>, next_scene: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            next_scene: next_scene.into(),
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|value| !value.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_parses_mixed_dialogue() {
        // Arrange
        let json = serde_json::json!({
            "id": "scene_1",
            "background": "park.png",
            "characters": [{ "name": "Алиса", "sprite": "alice.png", "position": "left" }],
            "dialogue": [
                { "speaker": "Алиса", "text": "Привет!" },
                {
                    "command": "change_sprite",
                    "character": "Алиса",
                    "sprite": "alice_smile.png"
                },
                {
                    "command": "add_character",
                    "character": { "name": "Май", "sprite": "mai.png", "position": "right" }
                },
                { "command": "remove_character", "character_name": "Май" },
                { "text": "The wind picks up." }
            ],
            "choices": [{ "text": "Go", "next_scene": "scene_2" }]
        });

        // Act
        let scene: Scene = serde_json::from_value(json).unwrap();

        // Assert
        assert_eq!(scene.id, "scene_1");
        assert_eq!(scene.background.as_deref(), Some("park.png"));
        assert_eq!(scene.characters[0].position, Position::Left);
        assert_eq!(scene.dialogue.len(), 5);
        assert_eq!(scene.text_line_count(), 2);
        assert_eq!(
            scene.dialogue[1],
            DialogueEntry::Command(StageCommand::ChangeSprite {
                character: "Алиса".to_owned(),
                sprite: "alice_smile.png".to_owned(),
            })
        );
        match &scene.dialogue[4] {
            DialogueEntry::Line(line) => {
                assert_eq!(line.speaker, None);
                assert_eq!(line.text, "The wind picks up.");
            }
            other => panic!("expected narration line, got {other:?}"),
        }
    }

    #[test]
    fn test_scene_treats_null_collections_and_blank_background_as_empty() {
        let json = serde_json::json!({
            "id": "s",
            "background": "",
            "characters": null,
            "dialogue": null,
            "choices": null
        });

        let scene: Scene = serde_json::from_value(json).unwrap();

        assert_eq!(scene, Scene::new("s"));
    }

    #[test]
    fn test_unknown_command_parses_as_unsupported() {
        let json = serde_json::json!({ "command": "play_sound", "sound": "bell.ogg" });

        let entry: DialogueEntry = serde_json::from_value(json).unwrap();

        assert_eq!(entry, DialogueEntry::Command(StageCommand::Unsupported));
    }

    #[test]
    fn test_malformed_commands_are_unsupported_not_lines() {
        // Arrange
        let json = r#"{"id":"s","dialogue":[
            {"command":"remove_character","character":"Mai"},
            {"command":"change_sprite","character":"Mai"},
            {"command":null},
            {"speaker":"Mai","text":"Still here."}
        ]}"#;

        // Act
        let scene: Scene = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(scene.text_line_count(), 1);
        assert_eq!(
            scene.dialogue[..3],
            [
                DialogueEntry::Command(StageCommand::Unsupported),
                DialogueEntry::Command(StageCommand::Unsupported),
                DialogueEntry::Command(StageCommand::Unsupported),
            ]
        );
    }

    #[test]
    fn test_entry_without_command_tag_must_be_an_object_line() {
        let result = serde_json::from_str::<DialogueEntry>("42");

        assert!(result.is_err());
    }

    #[test]
    fn test_custom_position_is_preserved() {
        let position: Position = serde_json::from_value(serde_json::json!("far-left")).unwrap();

        assert_eq!(position, Position::Other("far-left".to_owned()));
        assert_eq!(serde_json::to_value(&position).unwrap(), "far-left");
    }
}
