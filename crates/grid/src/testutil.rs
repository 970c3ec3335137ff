//! Fixtures shared by the pipeline tests.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use steamgrid_artwork::{FetchedImage, ImageProvider, ProviderFuture};

/// Encodes a solid-color JPEG.
pub(crate) fn jpeg(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb(color));
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, 90))
        .unwrap();
    buf
}

/// Encodes a solid-color PNG.
pub(crate) fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

/// In-memory provider that records every lookup.
#[derive(Default)]
pub(crate) struct MockProvider {
    pub(crate) official: HashMap<String, Vec<u8>>,
    pub(crate) search: HashMap<String, Vec<u8>>,
    /// When set, every lookup fails as if the network were down.
    pub(crate) offline: bool,
    pub(crate) calls: Mutex<Vec<String>>,
}

impl MockProvider {
    pub(crate) fn with_official(mut self, id: &str, bytes: Vec<u8>) -> Self {
        self.official.insert(id.to_string(), bytes);
        self
    }

    pub(crate) fn with_search(mut self, name: &str, bytes: Vec<u8>) -> Self {
        self.search.insert(name.to_string(), bytes);
        self
    }

    pub(crate) fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn lookup(
        &self,
        call: String,
        hit: Option<&Vec<u8>>,
    ) -> Result<Option<FetchedImage>, steamgrid_artwork::Error> {
        self.calls.lock().unwrap().push(call.clone());
        if self.offline {
            return Err(steamgrid_artwork::Error::Api {
                status: 503,
                body: "offline".into(),
            });
        }
        Ok(hit.map(|bytes| FetchedImage {
            bytes: bytes.clone(),
            content_type: None,
            url: format!("mock://{call}"),
        }))
    }
}

impl ImageProvider for MockProvider {
    fn official<'a>(&'a self, game_id: &'a str) -> ProviderFuture<'a> {
        let result = self.lookup(format!("official:{game_id}"), self.official.get(game_id));
        Box::pin(async move { result })
    }

    fn search<'a>(&'a self, name: &'a str) -> ProviderFuture<'a> {
        let result = self.lookup(format!("search:{name}"), self.search.get(name));
        Box::pin(async move { result })
    }
}
