//! Configuration for the archiver.
//!
//! Every tunable has a compiled-in default so the binary runs with no
//! arguments. The data directory follows this precedence:
//! 1. CHESS_ARCHIVE_DATA_DIR environment variable
//! 2. ./data (fallback)

use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use chess_client::DEFAULT_API_BASE;
use chrono::Datelike;

use crate::archive::MissingPgnPolicy;

/// Browser-like user agent; the archive API blocks obvious bot traffic.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Titles queried from the player directory when no single player is given.
pub const DEFAULT_TITLES: &[&str] = &[
    "GM", "WGM", "IM", "WIM", "FM", "WFM", "NM", "WNM", "CM", "WCM",
];

/// First year the archive API has games for.
pub const DEFAULT_START_YEAR: i32 = 2007;

pub const DEFAULT_WORKER_COUNT: usize = 12;

/// Pause after a failed remote lookup (in seconds).
pub const DEFAULT_BACKOFF_SECS: u64 = 5;

const DATA_DIR_ENV: &str = "CHESS_ARCHIVE_DATA_DIR";
const DEV_DATA_DIR: &str = "./data";
const ARCHIVE_SUBDIR: &str = "archives";
const SKIP_LIST_FILE: &str = "skip_list.txt";

/// Get the data directory for archives and the skip list.
///
/// Priority:
/// 1. CHESS_ARCHIVE_DATA_DIR env variable if set
/// 2. ./data as fallback
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    PathBuf::from(DEV_DATA_DIR)
}

/// Which players to archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Population {
    /// One explicitly named player.
    Single(String),
    /// Everyone holding any of these titles.
    Titled(Vec<String>),
}

impl Default for Population {
    fn default() -> Self {
        Self::Titled(DEFAULT_TITLES.iter().map(|t| t.to_string()).collect())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("worker count must be at least 1")]
    NoWorkers,
    #[error("start year {start} is after end year {end}")]
    InvertedYears { start: i32, end: i32 },
    #[error("no player or title to archive")]
    EmptyPopulation,
}

#[derive(Debug, Clone)]
pub struct ArchiverConfig {
    pub api_base: String,
    pub user_agent: String,
    pub population: Population,
    pub years: RangeInclusive<i32>,
    pub worker_count: usize,
    pub backoff: Duration,
    pub data_dir: PathBuf,
    pub missing_pgn_policy: MissingPgnPolicy,
}

impl Default for ArchiverConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            population: Population::default(),
            years: DEFAULT_START_YEAR..=chrono::Local::now().year(),
            worker_count: DEFAULT_WORKER_COUNT,
            backoff: Duration::from_secs(DEFAULT_BACKOFF_SECS),
            data_dir: get_data_dir(),
            missing_pgn_policy: MissingPgnPolicy::default(),
        }
    }
}

impl ArchiverConfig {
    pub fn archive_dir(&self) -> PathBuf {
        self.data_dir.join(ARCHIVE_SUBDIR)
    }

    pub fn skip_list_path(&self) -> PathBuf {
        self.data_dir.join(SKIP_LIST_FILE)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.years.start() > self.years.end() {
            return Err(ConfigError::InvertedYears {
                start: *self.years.start(),
                end: *self.years.end(),
            });
        }
        let empty = match &self.population {
            Population::Single(player) => player.trim().is_empty(),
            Population::Titled(titles) => titles.is_empty(),
        };
        if empty {
            return Err(ConfigError::EmptyPopulation);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_data_dir_fallback() {
        // If CHESS_ARCHIVE_DATA_DIR is set in the environment, that value wins
        let dir = get_data_dir();
        match std::env::var(DATA_DIR_ENV) {
            Ok(val) => assert_eq!(dir, PathBuf::from(val)),
            Err(_) => assert_eq!(dir, PathBuf::from(DEV_DATA_DIR)),
        }
    }

    #[test]
    fn test_defaults() {
        let config = ArchiverConfig::default();
        assert_eq!(config.api_base, "https://api.chess.com/pub");
        assert_eq!(config.worker_count, 12);
        assert_eq!(config.backoff, Duration::from_secs(5));
        assert_eq!(*config.years.start(), DEFAULT_START_YEAR);
        assert!(*config.years.end() >= 2024);
        assert_eq!(config.missing_pgn_policy, MissingPgnPolicy::SkipYear);
        match &config.population {
            Population::Titled(titles) => assert!(titles.iter().any(|t| t == "GM")),
            other => panic!("unexpected default population: {:?}", other),
        }
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_paths_derive_from_data_dir() {
        let config = ArchiverConfig {
            data_dir: PathBuf::from("/tmp/games"),
            ..ArchiverConfig::default()
        };
        assert_eq!(config.archive_dir(), PathBuf::from("/tmp/games/archives"));
        assert_eq!(
            config.skip_list_path(),
            PathBuf::from("/tmp/games/skip_list.txt")
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ArchiverConfig {
            worker_count: 0,
            ..ArchiverConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoWorkers));

        let config = ArchiverConfig {
            years: 2022..=2020,
            ..ArchiverConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedYears {
                start: 2022,
                end: 2020
            })
        );

        let config = ArchiverConfig {
            population: Population::Single("  ".to_string()),
            ..ArchiverConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyPopulation));
    }
}
