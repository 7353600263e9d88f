//! Wire types for the archive API.

use serde::{Deserialize, Serialize};

/// Body of `GET /player/{player}/games/{year}/{month}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonthGames {
    pub games: Vec<RawGame>,
}

/// One game as listed by the archive.
///
/// `pgn` is optional here so that a listing with a game lacking it still
/// decodes; what to do with such a game is the caller's decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawGame {
    pub pgn: Option<String>,
    pub url: Option<String>,
    pub end_time: Option<i64>,
}

impl RawGame {
    pub fn from_pgn(pgn: impl Into<String>) -> Self {
        Self {
            pgn: Some(pgn.into()),
            ..Self::default()
        }
    }
}

/// Body of `GET /titled/{title}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TitledPlayers {
    pub players: Vec<String>,
}
