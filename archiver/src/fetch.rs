//! Remote lookups that never fail.
//!
//! Any transport or schema error is logged, followed by a fixed pause so a
//! struggling service is not hammered, and reported to the caller as "no
//! data". There is no retry: a month that failed stays empty for this run.

use chess_client::{GameSource, RawGame};
use std::sync::Arc;
use std::time::Duration;

pub struct MonthFetcher<S> {
    source: Arc<S>,
    backoff: Duration,
}

impl<S: GameSource> MonthFetcher<S> {
    pub fn new(source: Arc<S>, backoff: Duration) -> Self {
        Self { source, backoff }
    }

    /// Games for one player-month, or an empty list if the lookup failed.
    pub async fn fetch_month(&self, player: &str, year: i32, month: u32) -> Vec<RawGame> {
        match self.source.month_games(player, year, month).await {
            Ok(games) => games,
            Err(e) => {
                tracing::warn!(
                    player,
                    year,
                    month,
                    backoff_ms = self.backoff.as_millis() as u64,
                    "Month fetch failed, treating as empty: {}",
                    e
                );
                tokio::time::sleep(self.backoff).await;
                Vec::new()
            }
        }
    }
}

pub struct DirectoryFetcher<S> {
    source: Arc<S>,
    backoff: Duration,
}

impl<S: GameSource> DirectoryFetcher<S> {
    pub fn new(source: Arc<S>, backoff: Duration) -> Self {
        Self { source, backoff }
    }

    /// Players holding `title`, or an empty list if the lookup failed.
    pub async fn titled_players(&self, title: &str) -> Vec<String> {
        match self.source.titled_players(title).await {
            Ok(players) => players,
            Err(e) => {
                tracing::warn!(title, "Directory fetch failed, treating as empty: {}", e);
                tokio::time::sleep(self.backoff).await;
                Vec::new()
            }
        }
    }
}
