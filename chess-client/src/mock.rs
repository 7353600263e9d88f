//! Mock GameSource implementation for testing

use crate::error::{ClientError, ClientResult};
use crate::traits::GameSource;
use crate::types::RawGame;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type MonthKey = (String, i32, u32);
type Responder<T> = Box<dyn Fn() -> ClientResult<T> + Send>;

/// Mock archive for testing - only compiled in test mode or with mock feature.
///
/// Months without a configured response answer with an empty listing, as the
/// real service does for a month without games. Titles without a configured
/// response fail with `NotConfigured`.
#[derive(Clone, Default)]
pub struct MockGameSource {
    responses: Arc<Mutex<MockResponses>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Default)]
struct MockResponses {
    months: HashMap<MonthKey, Responder<Vec<RawGame>>>,
    titles: HashMap<String, Responder<Vec<String>>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    MonthGames {
        player: String,
        year: i32,
        month: u32,
    },
    TitledPlayers {
        title: String,
    },
}

impl MockGameSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the listing returned for one month
    pub fn with_month(self, player: &str, year: i32, month: u32, games: Vec<RawGame>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .months
            .insert((player.to_string(), year, month), Box::new(move || Ok(games.clone())));
        self
    }

    /// Configure one month to fail with a server error
    pub fn with_month_error(self, player: &str, year: i32, month: u32) -> Self {
        let url = format!("mock://player/{player}/games/{year}/{month:02}");
        self.responses.lock().unwrap().months.insert(
            (player.to_string(), year, month),
            Box::new(move || {
                Err(ClientError::Status {
                    status: 500,
                    url: url.clone(),
                })
            }),
        );
        self
    }

    /// Configure the directory listing for a title
    pub fn with_titled(self, title: &str, players: &[&str]) -> Self {
        let players: Vec<String> = players.iter().map(|p| p.to_string()).collect();
        self.responses
            .lock()
            .unwrap()
            .titles
            .insert(title.to_string(), Box::new(move || Ok(players.clone())));
        self
    }

    /// Configure a title lookup to return an undecodable body
    pub fn with_titled_error(self, title: &str) -> Self {
        let url = format!("mock://titled/{title}");
        self.responses.lock().unwrap().titles.insert(
            title.to_string(),
            Box::new(move || {
                Err(ClientError::Decode {
                    url: url.clone(),
                    message: "missing field `players`".to_string(),
                })
            }),
        );
        self
    }

    /// Get recorded calls for verification
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Month fetches recorded for one player
    pub fn month_calls_for(&self, player: &str) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|call| matches!(call, MockCall::MonthGames { player: p, .. } if p == player))
            .count()
    }

    /// Clear call history
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }
}

#[async_trait]
impl GameSource for MockGameSource {
    async fn month_games(
        &self,
        player: &str,
        year: i32,
        month: u32,
    ) -> ClientResult<Vec<RawGame>> {
        self.call_log.lock().unwrap().push(MockCall::MonthGames {
            player: player.to_string(),
            year,
            month,
        });

        let responses = self.responses.lock().unwrap();
        match responses.months.get(&(player.to_string(), year, month)) {
            Some(f) => f(),
            None => Ok(Vec::new()),
        }
    }

    async fn titled_players(&self, title: &str) -> ClientResult<Vec<String>> {
        self.call_log.lock().unwrap().push(MockCall::TitledPlayers {
            title: title.to_string(),
        });

        let responses = self.responses.lock().unwrap();
        match responses.titles.get(title) {
            Some(f) => f(),
            None => Err(ClientError::NotConfigured(format!("titled/{title}"))),
        }
    }
}
