//! HTTP implementation of [`GameSource`] for the chess.com published-data API

use crate::error::{ClientError, ClientResult};
use crate::traits::GameSource;
use crate::types::{MonthGames, RawGame, TitledPlayers};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.chess.com/pub";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Network client for the published-data API.
///
/// The service rejects obvious bot traffic, so the user agent is supplied by
/// the caller (normally a browser-like string from configuration).
pub struct ChessComClient {
    http: reqwest::Client,
    api_base: String,
}

impl ChessComClient {
    pub fn new(api_base: &str, user_agent: &str) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn month_url(&self, player: &str, year: i32, month: u32) -> String {
        format!(
            "{}/player/{}/games/{}/{:02}",
            self.api_base, player, year, month
        )
    }

    pub fn titled_url(&self, title: &str) -> String {
        format!("{}/titled/{}", self.api_base, title)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ClientResult<T> {
        tracing::debug!(url = %url, "Querying archive API");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl GameSource for ChessComClient {
    async fn month_games(
        &self,
        player: &str,
        year: i32,
        month: u32,
    ) -> ClientResult<Vec<RawGame>> {
        let url = self.month_url(player, year, month);
        let listing: MonthGames = self.get_json(&url).await?;
        Ok(listing.games)
    }

    async fn titled_players(&self, title: &str) -> ClientResult<Vec<String>> {
        let url = self.titled_url(title);
        let directory: TitledPlayers = self.get_json(&url).await?;
        Ok(directory.players)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_url_pads_month() {
        let client = ChessComClient::new(DEFAULT_API_BASE, "test-agent").unwrap();
        assert_eq!(
            client.month_url("networkdirection", 2022, 9),
            "https://api.chess.com/pub/player/networkdirection/games/2022/09"
        );
        assert_eq!(
            client.month_url("hikaru", 2015, 12),
            "https://api.chess.com/pub/player/hikaru/games/2015/12"
        );
    }

    #[test]
    fn test_titled_url_trims_trailing_slash() {
        let client = ChessComClient::new("http://localhost:8080/pub/", "test-agent").unwrap();
        assert_eq!(client.titled_url("GM"), "http://localhost:8080/pub/titled/GM");
    }
}
