//! GameSource trait abstraction for client implementations

use crate::error::ClientResult;
use crate::types::RawGame;
use async_trait::async_trait;

/// Read-only view of the remote game archive.
/// Implemented by both the real ChessComClient and MockGameSource.
#[async_trait]
pub trait GameSource: Send + Sync {
    /// Games a player finished in the given calendar month (1-12).
    async fn month_games(&self, player: &str, year: i32, month: u32)
        -> ClientResult<Vec<RawGame>>;

    /// Usernames holding the given title (GM, IM, ...).
    async fn titled_players(&self, title: &str) -> ClientResult<Vec<String>>;
}
