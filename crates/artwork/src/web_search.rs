//! Generic web image search.
//!
//! Fetches a search results page and picks the first result link that
//! carries an `imgurl=` parameter pointing at a JPEG or PNG. The page URL is
//! a template so the endpoint can be swapped without a rebuild.

use percent_encoding::{NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::error::Error;
use crate::http::fetch_image;
use crate::provider::FetchedImage;

pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search?tbm=isch&q={query}";

/// Appended to the game name to bias results towards grid-shaped art.
const QUERY_SUFFIX: &str = " steam grid";

/// Scrapes an image search results page.
pub struct WebImageSearch {
    http: reqwest::Client,
    url_template: String,
}

impl WebImageSearch {
    /// `url_template` must contain `{query}`.
    pub fn new(http: reqwest::Client, url_template: impl Into<String>) -> Self {
        Self {
            http,
            url_template: url_template.into(),
        }
    }

    /// Returns the results page URL for a game name.
    pub fn search_url(&self, name: &str) -> String {
        let query = format!("{name}{QUERY_SUFFIX}");
        let encoded = utf8_percent_encode(&query, NON_ALPHANUMERIC).to_string();
        self.url_template.replace("{query}", &encoded)
    }

    /// Downloads the first plausible image result for `name`.
    pub async fn find_image(&self, name: &str) -> Result<Option<FetchedImage>, Error> {
        let resp = self.http.get(self.search_url(name)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::debug!(name, status = status.as_u16(), "image search failed");
            return Ok(None);
        }
        let page = resp.text().await?;

        let Some(url) = extract_image_urls(&page).into_iter().next() else {
            return Ok(None);
        };
        tracing::debug!(name, url = %url, "image search match");
        fetch_image(&self.http, &url).await
    }
}

/// Collects decoded `imgurl=` targets that look like JPEG or PNG files.
fn extract_image_urls(page: &str) -> Vec<String> {
    const MARKER: &str = "imgurl=";

    let mut urls = Vec::new();
    let mut rest = page;
    while let Some(start) = rest.find(MARKER) {
        rest = &rest[start + MARKER.len()..];
        let end = rest
            .find(|c: char| matches!(c, '&' | '"' | '\'' | '<' | '>') || c.is_whitespace())
            .unwrap_or(rest.len());

        let Ok(url) = percent_decode_str(&rest[..end]).decode_utf8() else {
            continue;
        };
        if is_plausible_image_url(&url) && !urls.iter().any(|u: &String| u.as_str() == &*url) {
            urls.push(url.into_owned());
        }
        rest = &rest[end..];
    }
    urls
}

fn is_plausible_image_url(url: &str) -> bool {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return false;
    }
    let path = url.split(['?', '#']).next().unwrap_or("").to_ascii_lowercase();
    [".jpg", ".jpeg", ".png"].iter().any(|ext| path.ends_with(ext))
}
