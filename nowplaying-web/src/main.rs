use nowplaying_web::{config::Config, AppState};
use spotify::SpotifyClient;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::from_env().expect("invalid configuration");
    if let Err(e) = config.credentials() {
        tracing::warn!("{}, every request will get the idle badge", e);
    }
    let addr = config.addr();
    let app = nowplaying_web::app(AppState {
        config,
        spotify: SpotifyClient::new(),
    });

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    tracing::info!("Server running at http://{}/", addr);
    axum::serve(listener, app).await.unwrap();
}
