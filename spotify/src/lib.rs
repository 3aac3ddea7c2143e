use async_trait::async_trait;
use base64::prelude::{Engine, BASE64_STANDARD};
use hyper::{
    client::HttpConnector,
    header::{AUTHORIZATION, CONTENT_TYPE},
    Body, Client, Method, Request, StatusCode,
};
use hyper_tls::HttpsConnector;
use nowplaying::{Artwork, Error, PlaybackState, DEFAULT_IMAGE_MIME_TYPE};
use serde::{Deserialize, Serialize};

pub const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const CURRENTLY_PLAYING_URL: &str = "https://api.spotify.com/v1/me/player/currently-playing";

#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl Credentials {
    /// Value for the `Authorization` header sent to the token endpoint
    pub fn authorization(&self) -> String {
        format!(
            "Basic {}",
            BASE64_STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret))
        )
    }

    fn refresh_body(&self) -> String {
        format!(
            "grant_type=refresh_token&refresh_token={}",
            urlencoding::encode(&self.refresh_token)
        )
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct Token {
    pub access_token: String,
}

#[async_trait]
pub trait Spotify: Send + Sync {
    async fn get_access_token(&self, credentials: &Credentials) -> Result<Token, Error>;
    /// Returns `None` when the account has nothing loaded
    async fn get_currently_playing(&self, token: &Token) -> Result<Option<PlaybackState>, Error>;
    async fn get_artwork(&self, url: &str) -> Result<Artwork, Error>;
}

pub struct SpotifyClient {
    client: Client<HttpsConnector<HttpConnector>>,
}

impl SpotifyClient {
    pub fn new() -> SpotifyClient {
        let https = HttpsConnector::new();
        SpotifyClient {
            client: Client::builder().build::<_, hyper::Body>(https),
        }
    }
}

impl Default for SpotifyClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Spotify for SpotifyClient {
    async fn get_access_token(&self, credentials: &Credentials) -> Result<Token, Error> {
        let resp = self
            .client
            .request(
                Request::builder()
                    .method(Method::POST)
                    .uri(TOKEN_URL)
                    .header(AUTHORIZATION, credentials.authorization())
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(credentials.refresh_body()))?,
            )
            .await
            .map_err(|e| Error::upstream_auth(e.to_string()))?;
        let status = resp.status();
        let got = hyper::body::to_bytes(resp.into_body())
            .await
            .map_err(|e| Error::upstream_auth(e.to_string()))?;
        parse_token(status, &got)
    }

    async fn get_currently_playing(&self, token: &Token) -> Result<Option<PlaybackState>, Error> {
        let resp = self
            .client
            .request(
                Request::builder()
                    .uri(CURRENTLY_PLAYING_URL)
                    .header(AUTHORIZATION, format!("Bearer {}", token.access_token))
                    .body(Body::empty())?,
            )
            .await
            .map_err(|e| Error::upstream_playback(e.to_string()))?;
        let status = resp.status();
        let got = hyper::body::to_bytes(resp.into_body())
            .await
            .map_err(|e| Error::upstream_playback(e.to_string()))?;
        parse_currently_playing(status, &got)
    }

    async fn get_artwork(&self, url: &str) -> Result<Artwork, Error> {
        let resp = self
            .client
            .request(
                Request::builder()
                    .uri(url)
                    .body(Body::empty())
                    .map_err(|e| Error::image_fetch(format!("{url}: {e}")))?,
            )
            .await
            .map_err(|e| Error::image_fetch(format!("{url}: {e}")))?;
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned);
        let got = hyper::body::to_bytes(resp.into_body())
            .await
            .map_err(|e| Error::image_fetch(format!("{url}: {e}")))?;
        parse_artwork(url, status, content_type.as_deref(), &got)
    }
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| status.as_str().to_owned())
}

fn parse_token(status: StatusCode, body: &[u8]) -> Result<Token, Error> {
    if !status.is_success() {
        return Err(Error::upstream_auth(format!(
            "Failed to fetch Spotify token: {}",
            status_text(status)
        )));
    }
    serde_json::from_slice(body).map_err(Error::from)
}

fn parse_currently_playing(
    status: StatusCode,
    body: &[u8],
) -> Result<Option<PlaybackState>, Error> {
    if !status.is_success() {
        return Err(Error::upstream_playback(format!(
            "Failed to fetch currently playing song: {}",
            status_text(status)
        )));
    }
    // 204 means no active device
    if status == StatusCode::NO_CONTENT || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) else {
        tracing::warn!("currently playing response was not JSON");
        return Ok(None);
    };
    Ok(Some(serde_json::from_value(value)?))
}

fn parse_artwork(
    url: &str,
    status: StatusCode,
    content_type: Option<&str>,
    body: &[u8],
) -> Result<Artwork, Error> {
    if !status.is_success() {
        return Err(Error::image_fetch(format!(
            "Failed to fetch {url}: {}",
            status_text(status)
        )));
    }
    tracing::debug!(url, bytes = body.len(), "fetched artwork");
    Ok(Artwork::new(mime_type(content_type), body.to_vec()))
}

/// Trusts the response's `Content-Type` only if it names an image
fn mime_type(content_type: Option<&str>) -> &str {
    content_type
        .and_then(|c| c.split(';').next())
        .map(str::trim)
        .filter(|c| c.starts_with("image/"))
        .unwrap_or(DEFAULT_IMAGE_MIME_TYPE)
}
