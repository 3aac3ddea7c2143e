use nowplaying::Error;
use serde::Deserialize;
use spotify::Credentials;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Process configuration, read from the environment once at startup.
///
/// Spotify credentials are kept optional so that a misconfigured server still
/// answers every request with the idle badge instead of refusing to start.
#[derive(Clone, Deserialize)]
pub struct Config {
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    pub spotify_refresh_token: Option<String>,
    /// Read from `BADGE_HOST` and `BADGE_PORT`, never the bare `HOST`/`PORT`
    #[serde(rename = "badge_host", default = "default_host")]
    pub host: IpAddr,
    #[serde(rename = "badge_port", default = "default_port")]
    pub port: u16,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    3000
}

impl Config {
    pub fn from_env() -> Result<Config, Error> {
        envy::from_env().map_err(|e| Error::config(e.to_string()))
    }

    pub fn from_vars<I>(vars: I) -> Result<Config, Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars).map_err(|e| Error::config(e.to_string()))
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn credentials(&self) -> Result<Credentials, Error> {
        let vars = [
            ("SPOTIFY_CLIENT_ID", present(&self.spotify_client_id)),
            ("SPOTIFY_CLIENT_SECRET", present(&self.spotify_client_secret)),
            ("SPOTIFY_REFRESH_TOKEN", present(&self.spotify_refresh_token)),
        ];
        if let [(_, Some(client_id)), (_, Some(client_secret)), (_, Some(refresh_token))] = vars {
            return Ok(Credentials {
                client_id: client_id.to_owned(),
                client_secret: client_secret.to_owned(),
                refresh_token: refresh_token.to_owned(),
            });
        }
        let missing: Vec<_> = vars
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();
        Err(Error::config(format!(
            "Missing Spotify credentials: {}",
            missing.join(", ")
        )))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod test {
    use super::Config;
    use nowplaying::Error;
    use std::net::SocketAddr;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(Vec::new()).unwrap();
        assert_eq!(config.addr(), SocketAddr::from(([127, 0, 0, 1], 3000)));
        assert!(config.spotify_client_id.is_none());
    }

    #[test]
    fn test_credentials() {
        let config = Config::from_vars(vars(&[
            ("SPOTIFY_CLIENT_ID", "id"),
            ("SPOTIFY_CLIENT_SECRET", "secret"),
            ("SPOTIFY_REFRESH_TOKEN", "refresh"),
            ("BADGE_HOST", "0.0.0.0"),
            ("BADGE_PORT", "8080"),
        ]))
        .unwrap();
        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.client_id, "id");
        assert_eq!(credentials.client_secret, "secret");
        assert_eq!(credentials.refresh_token, "refresh");
        assert_eq!(config.addr(), SocketAddr::from(([0, 0, 0, 0], 8080)));
    }

    #[test]
    fn test_missing_credentials() {
        let config = Config::from_vars(vars(&[
            ("SPOTIFY_CLIENT_ID", "id"),
            ("SPOTIFY_CLIENT_SECRET", ""),
        ]))
        .unwrap();
        let Err(Error::Config(e)) = config.credentials() else {
            unreachable!()
        };
        assert_eq!(
            e,
            "Missing Spotify credentials: SPOTIFY_CLIENT_SECRET, SPOTIFY_REFRESH_TOKEN"
        );
    }

    #[test]
    fn test_invalid_port() {
        let Err(Error::Config(_)) = Config::from_vars(vars(&[("BADGE_PORT", "http")])) else {
            unreachable!()
        };
    }

    #[test]
    fn test_ignores_generic_host_and_port() {
        let config = Config::from_vars(vars(&[
            ("HOST", "devbox.local"),
            ("PORT", "not-a-port"),
        ]))
        .unwrap();
        assert_eq!(config.addr(), SocketAddr::from(([127, 0, 0, 1], 3000)));
    }
}
