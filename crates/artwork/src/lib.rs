//! Grid image providers.
//!
//! Everything that talks to the network lives here: the official Steam CDN
//! header lookup, the SteamGridDB API and a generic web image search page.
//! [`HttpImageProvider`] combines an official lookup with one search
//! backend behind the [`ImageProvider`] trait that the grid pipeline uses.

pub mod error;
pub mod format;
pub mod http;
pub mod provider;
pub mod steam_cdn;
pub mod steamgriddb;
pub mod web_search;

#[cfg(test)]
pub(crate) mod mock;

pub use error::Error;
pub use format::ImageKind;
pub use http::{DEFAULT_HEADER_TIMEOUT, HttpConfig, build_http_client};
pub use provider::{FetchedImage, HttpImageProvider, ImageProvider, ProviderFuture, SearchBackend};
pub use steam_cdn::SteamCdn;
pub use steamgriddb::SteamGridDb;
pub use web_search::WebImageSearch;
