use axum::{
    extract::State,
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::IntoResponse,
    Router,
};
use nowplaying::Error;
use spotify::Spotify;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod badge;
pub mod config;

use badge::{Badge, SVG_CONTENT_TYPE};
use config::Config;

pub struct AppState<S> {
    pub config: Config,
    pub spotify: S,
}

/// Every method and path gets the badge.
pub fn app<S: Spotify + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .fallback(badge_handler::<S>)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Always 200 with an SVG body so image embeds never break.
pub async fn badge_handler<S: Spotify>(State(state): State<Arc<AppState<S>>>) -> impl IntoResponse {
    let badge = badge_or_default(&state.config, &state.spotify).await;
    (
        [(CONTENT_TYPE, SVG_CONTENT_TYPE), (CACHE_CONTROL, "no-cache")],
        badge.render(),
    )
}

pub async fn badge_or_default(config: &Config, spotify: &impl Spotify) -> Badge {
    match now_playing(config, spotify).await {
        Ok(badge) => badge,
        Err(e) => {
            tracing::error!(kind = e.kind(), "Error occurred: {}", e);
            Badge::Idle
        }
    }
}

pub async fn now_playing(config: &Config, spotify: &impl Spotify) -> Result<Badge, Error> {
    let credentials = config.credentials()?;
    let token = spotify.get_access_token(&credentials).await?;
    let Some(state) = spotify.get_currently_playing(&token).await? else {
        return Ok(Badge::Idle);
    };
    if !state.is_playing {
        return Ok(Badge::Idle);
    }
    let track = state
        .item
        .ok_or_else(|| Error::data_shape("is_playing is set but item is missing"))?;
    let progress_ms = state
        .progress_ms
        .ok_or_else(|| Error::data_shape("is_playing is set but progress_ms is missing"))?;
    let artwork = spotify.get_artwork(track.album_image_url()?).await?;
    Ok(Badge::Playing {
        artwork_uri: artwork.to_data_uri(),
        artist: track.artist_names(),
        track: track.name,
        progress_ms,
        duration_ms: track.duration_ms,
    })
}
