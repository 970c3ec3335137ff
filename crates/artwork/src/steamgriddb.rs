//! SteamGridDB name search.
//!
//! Uses the API v2 with Bearer token authentication: the autocomplete
//! endpoint resolves a display name to a SteamGridDB game, whose best
//! static landscape grid is then downloaded.

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;

use crate::error::Error;
use crate::http::fetch_image;
use crate::provider::FetchedImage;

const DEFAULT_BASE_URL: &str = "https://www.steamgriddb.com/api/v2";

/// Landscape grid sizes matching the Steam header layout.
const GRID_DIMENSIONS: &str = "460x215,920x430";

/// A game search result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResult {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub verified: bool,
}

/// Grid image metadata.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GridImage {
    pub id: i32,
    #[serde(default)]
    pub width: i32,
    #[serde(default)]
    pub height: i32,
    #[serde(default)]
    pub mime: String,
    #[serde(default)]
    pub url: String,
}

/// API response wrapper.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    #[serde(default)]
    data: T,
}

/// SteamGridDB API client.
pub struct SteamGridDb {
    http: reqwest::Client,
    api_key: HeaderValue,
    base_url: String,
}

impl SteamGridDb {
    /// Creates a client on top of the shared HTTP client.
    pub fn new(http: reqwest::Client, api_key: &str) -> Result<Self, Error> {
        let mut api_key = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| Error::InvalidKey)?;
        api_key.set_sensitive(true);

        Ok(Self {
            http,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Sets a custom base URL (for testing).
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Performs an authenticated GET request.
    async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Vec<u8>, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.api_key.clone());

        let url = format!("{}{}", self.base_url, endpoint);
        let resp = self
            .http
            .get(&url)
            .headers(headers)
            .query(params)
            .send()
            .await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.bytes().await?.to_vec())
    }

    /// Searches for games by name.
    pub async fn search(&self, term: &str) -> Result<Vec<SearchResult>, Error> {
        let encoded = utf8_percent_encode(term, NON_ALPHANUMERIC).to_string();
        let body = self
            .get(&format!("/search/autocomplete/{encoded}"), &[])
            .await?;
        let resp: ApiResponse<Vec<SearchResult>> = serde_json::from_slice(&body)?;
        Ok(resp.data)
    }

    /// Returns static landscape grids for a SteamGridDB game.
    pub async fn grids(&self, game_id: i32) -> Result<Vec<GridImage>, Error> {
        let params = [
            ("dimensions", GRID_DIMENSIONS),
            ("types", "static"),
            ("mimes", "image/png,image/jpeg"),
            ("nsfw", "false"),
            ("humor", "false"),
        ];
        let body = self.get(&format!("/grids/game/{game_id}"), &params).await?;
        let resp: ApiResponse<Vec<GridImage>> = serde_json::from_slice(&body)?;
        Ok(resp.data)
    }

    /// Downloads the first grid of the best-matching game.
    ///
    /// A failed API status is reported as a miss, except for a rejected
    /// API key, which would fail every lookup of the run.
    pub async fn find_grid(&self, name: &str) -> Result<Option<FetchedImage>, Error> {
        let Some(results) = miss_unless_unauthorized(self.search(name).await)? else {
            return Ok(None);
        };
        let Some(game) = results.first() else {
            return Ok(None);
        };
        tracing::debug!(name, matched = %game.name, id = game.id, "SteamGridDB match");

        let Some(grids) = miss_unless_unauthorized(self.grids(game.id).await)? else {
            return Ok(None);
        };
        let Some(grid) = grids.iter().find(|g| !g.url.is_empty()) else {
            return Ok(None);
        };

        fetch_image(&self.http, &grid.url).await
    }
}

fn miss_unless_unauthorized<T>(result: Result<T, Error>) -> Result<Option<T>, Error> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(Error::Api { status, body }) if !matches!(status, 401 | 403) => {
            tracing::debug!(status, %body, "SteamGridDB request failed");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
