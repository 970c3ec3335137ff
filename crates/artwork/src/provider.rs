//! The `ImageProvider` seam and its HTTP implementation.

use std::future::Future;
use std::pin::Pin;

use crate::error::Error;
use crate::steam_cdn::SteamCdn;
use crate::steamgriddb::SteamGridDb;
use crate::web_search::WebImageSearch;

/// Raw image bytes as served by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub url: String,
}

/// Boxed future returned by provider lookups.
pub type ProviderFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Option<FetchedImage>, Error>> + Send + 'a>>;

/// Source of grid images for games without one.
///
/// `Ok(None)` is a miss. `Err` means the provider could not be reached.
/// The pipeline is decoupled from HTTP through this trait and tests it
/// with mocks.
pub trait ImageProvider: Send + Sync {
    /// Exact lookup by game ID in the official catalog.
    fn official<'a>(&'a self, game_id: &'a str) -> ProviderFuture<'a>;

    /// Free-text lookup by display name; lower confidence.
    fn search<'a>(&'a self, name: &'a str) -> ProviderFuture<'a>;
}

/// Name search backend used after an official miss.
pub enum SearchBackend {
    SteamGridDb(SteamGridDb),
    Web(WebImageSearch),
    Disabled,
}

impl SearchBackend {
    async fn search(&self, name: &str) -> Result<Option<FetchedImage>, Error> {
        match self {
            SearchBackend::SteamGridDb(client) => client.find_grid(name).await,
            SearchBackend::Web(search) => search.find_image(name).await,
            SearchBackend::Disabled => Ok(None),
        }
    }
}

/// Steam CDN lookup with a name search fallback.
pub struct HttpImageProvider {
    cdn: SteamCdn,
    search: SearchBackend,
}

impl HttpImageProvider {
    pub fn new(cdn: SteamCdn, search: SearchBackend) -> Self {
        Self { cdn, search }
    }
}

impl ImageProvider for HttpImageProvider {
    fn official<'a>(&'a self, game_id: &'a str) -> ProviderFuture<'a> {
        Box::pin(self.cdn.header_image(game_id))
    }

    fn search<'a>(&'a self, name: &'a str) -> ProviderFuture<'a> {
        Box::pin(self.search.search(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpConfig, build_http_client};
    use crate::mock::{MockServer, Route};

    #[tokio::test]
    async fn official_goes_to_cdn() {
        let server = MockServer::start(vec![Route::ok(
            "/steam/apps/42/header.jpg",
            "image/jpeg",
            b"\xff\xd8\xffJPEG",
        )])
        .await;
        let http = build_http_client(&HttpConfig::default()).unwrap();
        let provider = HttpImageProvider::new(
            SteamCdn::new(http).with_base_url(server.base_url()),
            SearchBackend::Disabled,
        );

        let image = provider.official("42").await.unwrap().unwrap();
        assert_eq!(image.bytes, b"\xff\xd8\xffJPEG");

        assert!(provider.official("43").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn disabled_search_always_misses() {
        let http = build_http_client(&HttpConfig::default()).unwrap();
        let provider = HttpImageProvider::new(SteamCdn::new(http), SearchBackend::Disabled);
        assert!(provider.search("Anything").await.unwrap().is_none());
    }
}
