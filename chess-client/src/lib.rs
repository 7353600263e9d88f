//! Client library for a public chess game archive API.
//!
//! Two read-only endpoints are used: the per-player monthly game listing and
//! the titled-player directory. Callers program against [`GameSource`] so the
//! archiver can be exercised without the network.
//!
//! # Example
//!
//! ```no_run
//! use chess_client::{ChessComClient, GameSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ChessComClient::new("https://api.chess.com/pub", "my-archiver/0.1")?;
//!     let games = client.month_games("hikaru", 2022, 9).await?;
//!     println!("{} games", games.len());
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod traits;
mod types;

#[cfg(any(test, feature = "mock"))]
mod mock;

pub use client::{ChessComClient, DEFAULT_API_BASE};
pub use error::{ClientError, ClientResult};
pub use traits::GameSource;
pub use types::{MonthGames, RawGame, TitledPlayers};

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockCall, MockGameSource};
