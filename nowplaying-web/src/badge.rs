//! SVG rendering for the now playing badge.
//!
//! The badge is a 300x100 card. While a track is playing the progress bar is
//! animated by the client with a one-shot SMIL `<animate>`, so the server only
//! picks the starting width and how long the bar takes to fill.

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// Full width of the progress bar in pixels
pub const PROGRESS_BAR_WIDTH: f64 = 180.0;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Badge {
    Playing {
        /// `data:` URI of the album cover
        artwork_uri: String,
        artist: String,
        track: String,
        progress_ms: u64,
        duration_ms: u64,
    },
    /// Shown when nothing is playing and whenever building the badge failed
    Idle,
}

#[derive(Debug, PartialEq)]
pub struct Progress {
    /// Current bar width in pixels
    pub width: f64,
    pub remaining_secs: f64,
}

impl Progress {
    /// Returns `None` for tracks without a duration since there is nothing to animate.
    pub fn new(progress_ms: u64, duration_ms: u64) -> Option<Progress> {
        if duration_ms == 0 {
            return None;
        }
        let progress_ms = progress_ms.min(duration_ms);
        Some(Progress {
            width: progress_ms as f64 / duration_ms as f64 * PROGRESS_BAR_WIDTH,
            remaining_secs: (duration_ms - progress_ms) as f64 / 1000.0,
        })
    }
}

impl Badge {
    pub fn render(&self) -> String {
        match self {
            Badge::Playing {
                artwork_uri,
                artist,
                track,
                progress_ms,
                duration_ms,
            } => render_playing(
                artwork_uri,
                artist,
                track,
                Progress::new(*progress_ms, *duration_ms),
            ),
            Badge::Idle => render_idle(),
        }
    }
}

fn render_playing(
    artwork_uri: &str,
    artist: &str,
    track: &str,
    progress: Option<Progress>,
) -> String {
    let bar = match progress {
        Some(Progress {
            width,
            remaining_secs,
        }) if remaining_secs > 0.0 => format!(
            r#"<rect x="100" y="80" width="{width}" height="6" fill="white" rx="3">
    <animate attributeName="width" from="{width}" to="{PROGRESS_BAR_WIDTH}" dur="{remaining_secs}s" fill="freeze"/>
  </rect>"#
        ),
        Some(Progress { width, .. }) => {
            format!(r#"<rect x="100" y="80" width="{width}" height="6" fill="white" rx="3"/>"#)
        }
        None => r#"<rect x="100" y="80" width="0" height="6" fill="white" rx="3"/>"#.to_owned(),
    };
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="300" height="100" viewBox="0 0 300 100" fill="none">
  <rect width="300" height="100" rx="10" fill="#1DB954"/>
  <image href="{artwork}" x="10" y="10" width="80" height="80"/>
  <text x="100" y="40" font-family="Arial, sans-serif" font-size="14" fill="white">{track}</text>
  <text x="100" y="60" font-family="Arial, sans-serif" font-size="12" fill="white">by {artist}</text>
  <rect x="100" y="80" width="{PROGRESS_BAR_WIDTH}" height="6" fill="#ffffff33" rx="3"/>
  {bar}
</svg>
"##,
        artwork = escape(artwork_uri),
        track = escape(track),
        artist = escape(artist),
    )
}

fn render_idle() -> String {
    r##"<svg xmlns="http://www.w3.org/2000/svg" width="300" height="100" viewBox="0 0 300 100" fill="none">
  <rect width="300" height="100" rx="10" fill="#1DB954"/>
  <rect x="10" y="10" width="80" height="80" fill="white" rx="5"/>
  <text x="100" y="50" font-family="Arial, sans-serif" font-size="14" fill="white">No song currently playing</text>
</svg>
"##
    .to_owned()
}

fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}
