use base64::prelude::{Engine, BASE64_STANDARD};
use serde::{Deserialize, Serialize};

/// Spotify lists album images widest first, so index 1 is the 300px cover.
pub const ALBUM_IMAGE_INDEX: usize = 1;

pub const DEFAULT_IMAGE_MIME_TYPE: &str = "image/jpeg";

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlaybackState {
    pub is_playing: bool,
    // Null when nothing is loaded or during an ad break
    #[serde(default)]
    pub item: Option<Track>,
    #[serde(default)]
    pub progress_ms: Option<u64>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Track {
    pub name: String,
    pub artists: Vec<Artist>,
    pub album: Album,
    pub duration_ms: u64,
}

impl Track {
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn album_image_url(&self) -> Result<&str, Error> {
        self.album
            .images
            .get(ALBUM_IMAGE_INDEX)
            .map(|i| i.url.as_str())
            .ok_or_else(|| {
                Error::data_shape(format!(
                    "album for {:?} has {} images, expected at least {}",
                    self.name,
                    self.album.images.len(),
                    ALBUM_IMAGE_INDEX + 1
                ))
            })
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Artist {
    pub name: String,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Album {
    pub images: Vec<Image>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Image {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Raw image bytes tagged with their MIME type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Artwork {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl Artwork {
    pub fn new(mime_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Artwork {
        Artwork {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            BASE64_STANDARD.encode(&self.data)
        )
    }
}

#[derive(Debug)]
pub enum Error {
    /// Missing or unusable process configuration
    Config(String),
    /// Token endpoint returned a non-success status
    UpstreamAuth(String),
    /// Currently playing endpoint returned a non-success status
    UpstreamPlayback(String),
    ImageFetch(String),
    /// Upstream JSON didn't have the fields we need
    DataShape(String),
    InternalError(InternalError),
}

impl Error {
    pub fn config(e: impl Into<String>) -> Self {
        Self::Config(e.into())
    }

    pub fn upstream_auth(e: impl Into<String>) -> Self {
        Self::UpstreamAuth(e.into())
    }

    pub fn upstream_playback(e: impl Into<String>) -> Self {
        Self::UpstreamPlayback(e.into())
    }

    pub fn image_fetch(e: impl Into<String>) -> Self {
        Self::ImageFetch(e.into())
    }

    pub fn data_shape(e: impl Into<String>) -> Self {
        Self::DataShape(e.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "ConfigError",
            Error::UpstreamAuth(_) => "UpstreamAuthError",
            Error::UpstreamPlayback(_) => "UpstreamPlaybackError",
            Error::ImageFetch(_) => "ImageFetchError",
            Error::DataShape(_) => "DataShapeError",
            Error::InternalError(_) => "InternalError",
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Config(e)
            | Error::UpstreamAuth(e)
            | Error::UpstreamPlayback(e)
            | Error::ImageFetch(e)
            | Error::DataShape(e) => write!(f, "{}: {}", self.kind(), e),
            Error::InternalError(e) => write!(f, "{}: {:?}", self.kind(), e),
        }
    }
}

impl std::error::Error for Error {}

#[derive(Debug)]
pub enum InternalError {
    #[cfg(feature = "hyper")]
    RequestError(hyper::http::Error),
}

#[cfg(feature = "hyper")]
impl From<hyper::http::Error> for Error {
    fn from(e: hyper::http::Error) -> Error {
        Error::InternalError(InternalError::RequestError(e))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::DataShape(e.to_string())
    }
}
