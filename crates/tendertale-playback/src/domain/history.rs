//! Scene history: the ids of visited scenes, oldest first.

/// Ordered record of visited scenes. The last entry is the scene on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneHistory {
    entries: Vec<String>,
}

impl SceneHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `scene_id` unless it is already on top. Returns whether the
    /// history grew.
    pub fn push(&mut self, scene_id: &str) -> bool {
        if self.current() == Some(scene_id) {
            return false;
        }
        self.entries.push(scene_id.to_owned());
        true
    }

    /// The scene on top of the history.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    /// The scene below the top, i.e. where "go back" leads.
    #[must_use]
    pub fn previous(&self) -> Option<&str> {
        let len = self.entries.len();
        (len >= 2).then(|| self.entries[len - 2].as_str())
    }

    /// Whether there is a scene to go back to.
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.entries.len() > 1
    }

    /// Drops the top entry and returns the new top. Does nothing and returns
    /// `None` when there is no earlier scene.
    pub fn go_back(&mut self) -> Option<&str> {
        if !self.can_go_back() {
            return None;
        }
        self.entries.pop();
        self.current()
    }

    /// Replaces the whole history, e.g. with a loaded save.
    pub fn replace(&mut self, entries: Vec<String>) {
        self.entries = entries;
    }

    /// Forgets every visited scene.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no scene has been visited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl From<Vec<String>> for SceneHistory {
    fn from(entries: Vec<String>) -> Self {
        Self { entries }
    }
}
