//! Wire formats of the SteamGridDB v2 API.

use gridframe_core::{GameId, GameRecord, IconCandidate};
use serde::Deserialize;

/// Response from `/search/autocomplete/{term}`.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub data: Option<Vec<GameData>>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GameData {
    pub id: RawId,
    pub name: String,
}

/// Ids come back as numbers, but accept strings as well.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum RawId {
    Number(u64),
    Text(String),
}

impl From<RawId> for GameId {
    fn from(id: RawId) -> Self {
        match id {
            RawId::Number(n) => GameId::from(n),
            RawId::Text(s) => GameId::new(s),
        }
    }
}

impl From<GameData> for GameRecord {
    fn from(game: GameData) -> Self {
        GameRecord {
            id: game.id.into(),
            name: game.name,
        }
    }
}

/// Response from `/grids/game/{id}`.
#[derive(Debug, Deserialize)]
pub struct GridsResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub data: Option<Vec<GridData>>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GridData {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl GridData {
    /// Missing dimensions become 0, which no size filter accepts.
    pub fn into_candidate(self) -> IconCandidate {
        IconCandidate {
            url: self.url,
            width: self.width.unwrap_or(0),
            height: self.height.unwrap_or(0),
        }
    }
}
