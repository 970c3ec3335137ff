//! Official Steam catalog artwork.

use crate::error::Error;
use crate::http::fetch_image;
use crate::provider::FetchedImage;

const DEFAULT_BASE_URL: &str = "https://steamcdn-a.akamaihd.net";

/// Looks up the store header image published for every Steam app.
pub struct SteamCdn {
    http: reqwest::Client,
    base_url: String,
}

impl SteamCdn {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Sets a custom base URL (mirrors, tests).
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Returns the URL of the header image for an app.
    pub fn header_url(&self, app_id: &str) -> String {
        format!("{}/steam/apps/{app_id}/header.jpg", self.base_url)
    }

    /// Downloads the header image; `None` when the app has none.
    pub async fn header_image(&self, app_id: &str) -> Result<Option<FetchedImage>, Error> {
        fetch_image(&self.http, &self.header_url(app_id)).await
    }
}
