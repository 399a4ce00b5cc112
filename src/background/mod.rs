//! Background image loading.
//!
//! The editor never loads images itself. It hands a [`Background`] to a
//! [`BackgroundFetcher`] and later polls for the outcome on the UI thread.

mod fetcher;

use egui::Vec2;
use thiserror::Error;

use crate::document::Background;

pub use fetcher::ThreadFetcher;

/// Errors produced while fetching a background image
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("couldn't read {locator}: {source}")]
    Io {
        locator: String,
        #[source]
        source: std::io::Error,
    },

    #[error("couldn't decode image from {locator}: {source}")]
    Decode {
        locator: String,
        #[source]
        source: image::ImageError,
    },

    #[error("couldn't download {locator}: {source}")]
    Network {
        locator: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unsupported image locator {0}")]
    Unsupported(String),
}

impl FetchError {
    pub fn locator(&self) -> &str {
        match self {
            Self::Io { locator, .. }
            | Self::Decode { locator, .. }
            | Self::Network { locator, .. }
            | Self::Unsupported(locator) => locator,
        }
    }
}

/// Where the background image currently stands
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchStatus {
    #[default]
    Idle,
    Fetching,
    Fetched {
        size: Vec2,
    },
    Failed(String),
}

impl FetchStatus {
    pub fn is_fetching(&self) -> bool {
        matches!(self, Self::Fetching)
    }
}

/// A decoded background image, ready to upload as a texture
#[derive(Clone, PartialEq)]
pub struct FetchedImage {
    /// Width and height in pixels
    pub size: [usize; 2],
    /// Unmultiplied RGBA8 pixels, row-major
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for FetchedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchedImage")
            .field("size", &self.size)
            .field("rgba", &format!("<{} bytes>", self.rgba.len()))
            .finish()
    }
}

impl FetchedImage {
    pub fn decode(bytes: &[u8], locator: &str) -> Result<Self, FetchError> {
        let image = image::load_from_memory(bytes).map_err(|source| FetchError::Decode {
            locator: locator.to_owned(),
            source,
        })?;
        let rgba = image.to_rgba8();
        log::debug!("Decoded background {}x{}", rgba.width(), rgba.height());
        Ok(Self {
            size: [rgba.width() as usize, rgba.height() as usize],
            rgba: rgba.into_raw(),
        })
    }

    pub fn size_vec(&self) -> Vec2 {
        Vec2::new(self.size[0] as f32, self.size[1] as f32)
    }
}

/// The outcome of one fetch request
#[derive(Debug)]
pub struct FetchResult {
    /// The generation passed to [`BackgroundFetcher::request`]
    pub generation: u64,
    pub outcome: Result<FetchedImage, FetchError>,
}

/// Asynchronous loader of background images.
///
/// `request` must not block. Results are collected with `poll`, which the
/// editor calls from the UI thread until it returns `None`.
pub trait BackgroundFetcher {
    fn request(&mut self, generation: u64, background: &Background);
    fn poll(&mut self) -> Option<FetchResult>;
}

/// A one-shot message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn fetch_failed(locator: &str) -> Self {
        Self {
            title: "Background Image Fetch".to_owned(),
            message: format!("Couldn't load image from {locator}."),
        }
    }

    pub fn empty_pasteboard() -> Self {
        Self {
            title: "Paste Background".to_owned(),
            message: "There is no image currently on the pasteboard.".to_owned(),
        }
    }
}
