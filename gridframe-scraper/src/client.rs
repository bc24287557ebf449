use gridframe_core::{GameId, GameRecord, ICON_SIZE, IconCandidate};
use reqwest::Url;
use tokio::time::Duration;

use crate::error::ScrapeError;
use crate::types::{GridsResponse, SearchResponse};

pub const BASE_URL: &str = "https://www.steamgriddb.com/api/v2";

/// Timeout for the search and icon listing calls.
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for downloading an icon image.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(15);

const ICON_DIMENSIONS: &str = "1024x1024";
const ICON_TYPES: &str = "static";

/// HTTP client for the SteamGridDB API.
///
/// Every call is a single attempt: no retries, no rate limiting.
pub struct SteamGridDbClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl SteamGridDbClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ScrapeError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gridframe/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        })
    }

    /// Point the client at a different API root (mirrors, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Search for games by name, best match first.
    ///
    /// Failures are logged and reported as an empty list.
    pub async fn search_games(&self, name: &str) -> Vec<GameRecord> {
        match self.try_search_games(name).await {
            Ok(games) => games,
            Err(e) => {
                log::warn!("Search for \"{}\" failed: {}", name, e);
                Vec::new()
            }
        }
    }

    pub async fn try_search_games(&self, name: &str) -> Result<Vec<GameRecord>, ScrapeError> {
        let url = search_url(&self.base_url, name)?;
        let text = self.get_api(url).await?;
        parse_search_response(&text)
    }

    /// List the 1024x1024 static icons for a game, in service order.
    ///
    /// Failures are logged and reported as an empty list.
    pub async fn list_icons(&self, game: &GameId) -> Vec<IconCandidate> {
        match self.try_list_icons(game).await {
            Ok(icons) => icons,
            Err(e) => {
                log::warn!("Icon listing for game {} failed: {}", game, e);
                Vec::new()
            }
        }
    }

    pub async fn try_list_icons(&self, game: &GameId) -> Result<Vec<IconCandidate>, ScrapeError> {
        let url = grids_url(&self.base_url, game)?;
        let text = self.get_api(url).await?;
        parse_grids_response(&text)
    }

    /// Download an image. The CDN needs no authorization.
    pub async fn download_image(&self, url: &str) -> Result<Vec<u8>, ScrapeError> {
        let resp = self
            .http
            .get(url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::ServerError {
                status: status.as_u16(),
                message: format!("download of {} failed", url),
            });
        }

        let bytes = resp.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Authenticated GET against the API, returning the body text.
    async fn get_api(&self, url: Url) -> Result<String, ScrapeError> {
        log::debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.api_key)
            .timeout(LOOKUP_TIMEOUT)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ScrapeError::InvalidApiKey);
        }

        let text = resp.text().await?;
        if !status.is_success() {
            return Err(ScrapeError::ServerError {
                status: status.as_u16(),
                message: snippet(&text),
            });
        }

        Ok(text)
    }
}

/// `<base>/search/autocomplete/<name>`, with `name` encoded as one path segment.
pub fn search_url(base_url: &str, name: &str) -> Result<Url, ScrapeError> {
    let mut url = parse_base(base_url)?;
    url.path_segments_mut()
        .map_err(|_| ScrapeError::Config(format!("Base URL '{}' cannot hold a path", base_url)))?
        .pop_if_empty()
        .extend(["search", "autocomplete", name]);
    Ok(url)
}

/// `<base>/grids/game/<id>?dimensions=1024x1024&types=static`.
pub fn grids_url(base_url: &str, game: &GameId) -> Result<Url, ScrapeError> {
    let mut url = parse_base(base_url)?;
    url.path_segments_mut()
        .map_err(|_| ScrapeError::Config(format!("Base URL '{}' cannot hold a path", base_url)))?
        .pop_if_empty()
        .extend(["grids", "game", game.as_str()]);
    url.query_pairs_mut()
        .append_pair("dimensions", ICON_DIMENSIONS)
        .append_pair("types", ICON_TYPES);
    Ok(url)
}

fn parse_base(base_url: &str) -> Result<Url, ScrapeError> {
    Url::parse(base_url)
        .map_err(|e| ScrapeError::Config(format!("Invalid base URL '{}': {}", base_url, e)))
}

/// Parse a search response into game records, keeping service order.
pub fn parse_search_response(text: &str) -> Result<Vec<GameRecord>, ScrapeError> {
    let response: SearchResponse = serde_json::from_str(text).map_err(|e| {
        ScrapeError::Api(format!(
            "Failed to parse search results: {e}. Response: {}",
            snippet(text)
        ))
    })?;

    if response.success == Some(false) && response.data.is_none() {
        return Err(ScrapeError::Api(response.errors.unwrap_or_default().join("; ")));
    }

    Ok(response
        .data
        .unwrap_or_default()
        .into_iter()
        .map(GameRecord::from)
        .collect())
}

/// Parse an icon listing, keeping only exact 1024x1024 candidates.
///
/// The request already asks the service for that size; the result is
/// filtered again here because the service filter is not exact.
pub fn parse_grids_response(text: &str) -> Result<Vec<IconCandidate>, ScrapeError> {
    let response: GridsResponse = serde_json::from_str(text).map_err(|e| {
        ScrapeError::Api(format!(
            "Failed to parse icon list: {e}. Response: {}",
            snippet(text)
        ))
    })?;

    if response.success == Some(false) && response.data.is_none() {
        return Err(ScrapeError::Api(response.errors.unwrap_or_default().join("; ")));
    }

    Ok(filter_icons(
        response
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|g| g.into_candidate()),
    ))
}

/// Keep exactly-sized square icons, in order.
pub fn filter_icons(icons: impl IntoIterator<Item = IconCandidate>) -> Vec<IconCandidate> {
    icons
        .into_iter()
        .filter(|icon| icon.is_square(ICON_SIZE))
        .collect()
}

/// First 200 characters of a response body, for error messages.
fn snippet(text: &str) -> String {
    text.chars().take(200).collect()
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
