//! Stage command processor.
//!
//! Applies the non-text entries of a scene script to the cast and mirrors
//! each change on the render surface. Authoring mistakes (a command naming
//! a character who is not on stage, a command this client does not know)
//! are logged and skipped; playback always continues.

use tendertale_core::clock::Delay;
use tendertale_core::scene::StageCommand;
use tendertale_core::surface::RenderSurface;
use tracing::{debug, warn};

use crate::config::PlaybackConfig;
use crate::domain::cast::Cast;

/// Result of applying one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The stage changed and the settle delay elapsed.
    Applied,
    /// The command was not applicable and nothing changed.
    Skipped,
}

/// Interprets stage commands against a cast.
pub struct CommandProcessor<'a> {
    surface: &'a dyn RenderSurface,
    delay: &'a dyn Delay,
    config: &'a PlaybackConfig,
}

impl<'a> CommandProcessor<'a> {
    /// Creates a processor drawing on `surface`.
    #[must_use]
    pub fn new(
        surface: &'a dyn RenderSurface,
        delay: &'a dyn Delay,
        config: &'a PlaybackConfig,
    ) -> Self {
        Self {
            surface,
            delay,
            config,
        }
    }

    /// Applies `command` to `cast`. Applied commands are followed by the
    /// settle delay; commands never wait for a click.
    pub async fn apply(&self, command: &StageCommand, cast: &mut Cast) -> CommandOutcome {
        let outcome = match command {
            StageCommand::ChangeSprite { character, sprite } => {
                if cast.set_sprite(character, sprite) {
                    let path = self.config.asset_path(sprite);
                    self.surface.set_character_sprite(character, &path);
                    CommandOutcome::Applied
                } else {
                    warn!(
                        character = %character,
                        command = command.name(),
                        "character not on stage, skipping command"
                    );
                    CommandOutcome::Skipped
                }
            }
            StageCommand::AddCharacter { character } => {
                if cast.insert(character.clone()).is_some() {
                    debug!(character = %character.name, "replacing character already on stage");
                    self.surface.remove_character(&character.name);
                }
                self.surface.place_character(
                    &character.name,
                    &self.config.asset_path(&character.sprite),
                    &character.position,
                    true,
                );
                CommandOutcome::Applied
            }
            StageCommand::RemoveCharacter { character_name } => {
                if cast.remove(character_name).is_some() {
                    self.surface.remove_character(character_name);
                    CommandOutcome::Applied
                } else {
                    warn!(
                        character = %character_name,
                        command = command.name(),
                        "character not on stage, skipping command"
                    );
                    CommandOutcome::Skipped
                }
            }
            StageCommand::Unsupported => {
                warn!("unsupported stage command, skipping");
                CommandOutcome::Skipped
            }
        };

        if outcome == CommandOutcome::Applied {
            debug!(command = command.name(), "stage command applied");
            self.delay.sleep(self.config.settle_delay()).await;
        }
        outcome
    }
}
