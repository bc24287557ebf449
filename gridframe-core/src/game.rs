use std::fmt;

/// Service-assigned game identifier.
///
/// The metadata service hands out numeric ids, but nothing downstream does
/// arithmetic on them, so they are carried as opaque text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for GameId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A canonical game resolved from a free-text search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub id: GameId,
    /// Canonical display name, also used as the output file stem
    pub name: String,
}

impl GameRecord {
    pub fn new(id: impl Into<GameId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One icon image offered for a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconCandidate {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl IconCandidate {
    /// True when the candidate is exactly `size` x `size` pixels.
    pub fn is_square(&self, size: u32) -> bool {
        self.width == size && self.height == size
    }
}
