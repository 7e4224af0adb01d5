//! The set of characters currently on stage.

use tendertale_core::scene::Character;

/// On-stage characters keyed by name, in placement order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cast {
    members: Vec<Character>,
}

impl Cast {
    /// Creates an empty cast.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts `character` on stage. A character with the same name is replaced
    /// in place and returned.
    pub fn insert(&mut self, character: Character) -> Option<Character> {
        match self.members.iter_mut().find(|c| c.name == character.name) {
            Some(existing) => Some(std::mem::replace(existing, character)),
            None => {
                self.members.push(character);
                None
            }
        }
    }

    /// Takes the named character off stage.
    pub fn remove(&mut self, name: &str) -> Option<Character> {
        let index = self.members.iter().position(|c| c.name == name)?;
        Some(self.members.remove(index))
    }

    /// Looks up a character by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Character> {
        self.members.iter().find(|c| c.name == name)
    }

    /// Changes the sprite of the named character. Returns `false` when no
    /// such character is on stage.
    pub fn set_sprite(&mut self, name: &str, sprite: &str) -> bool {
        match self.members.iter_mut().find(|c| c.name == name) {
            Some(character) => {
                sprite.clone_into(&mut character.sprite);
                true
            }
            None => false,
        }
    }

    /// Whether the named character is on stage.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of characters on stage.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the stage is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Characters in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.members.iter()
    }
}
