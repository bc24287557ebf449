use gridframe_core::{GameId, GameRecord, IconCandidate};

use crate::client::SteamGridDbClient;
use crate::error::ScrapeError;

/// The remote lookups the pipeline needs, one call per step.
///
/// `search` and `list_icons` never fail: any problem yields an empty list,
/// the same as "no match".
#[allow(async_fn_in_trait)]
pub trait IconSource {
    /// Ranked candidate games for a free-text name.
    async fn search(&self, name: &str) -> Vec<GameRecord>;

    /// Icons for a game, already filtered to 1024x1024.
    async fn list_icons(&self, game: &GameId) -> Vec<IconCandidate>;

    /// Raw bytes behind an icon URL.
    async fn download(&self, url: &str) -> Result<Vec<u8>, ScrapeError>;
}

impl IconSource for SteamGridDbClient {
    async fn search(&self, name: &str) -> Vec<GameRecord> {
        self.search_games(name).await
    }

    async fn list_icons(&self, game: &GameId) -> Vec<IconCandidate> {
        SteamGridDbClient::list_icons(self, game).await
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ScrapeError> {
        self.download_image(url).await
    }
}
