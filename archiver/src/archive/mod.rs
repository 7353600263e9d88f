mod types;

pub use types::{ArchiveError, MissingPgnPolicy, YearOutcome};

use std::collections::BTreeMap;

use chess::{normalize, CanonicalGame, Normalized};
use chess_client::{GameSource, RawGame};
use chrono::{Datelike, NaiveDate};

use crate::fetch::MonthFetcher;
use crate::persistence::{dataset_id, ArchiveStore, SkipList, YearArchive};
use types::MissingPgn;

/// Fetches, normalizes and persists one player's games one year at a time.
///
/// A year is either written as a single archive file after all twelve months
/// have been processed, or recorded on the skip list. Both are checked before
/// anything is fetched, so re-running a year is free.
pub struct YearArchiver<S> {
    fetcher: MonthFetcher<S>,
    archives: ArchiveStore,
    skip_list: SkipList,
    policy: MissingPgnPolicy,
    today: NaiveDate,
}

impl<S: GameSource> YearArchiver<S> {
    pub fn new(
        fetcher: MonthFetcher<S>,
        archives: ArchiveStore,
        skip_list: SkipList,
        policy: MissingPgnPolicy,
        today: NaiveDate,
    ) -> Self {
        Self {
            fetcher,
            archives,
            skip_list,
            policy,
            today,
        }
    }

    pub async fn archive_year(&self, player: &str, year: i32) -> Result<YearOutcome, ArchiveError> {
        let id = dataset_id(player, year);

        if self.archives.exists(player, year) {
            tracing::debug!(player, year, "Archive already present");
            return Ok(YearOutcome::AlreadyArchived);
        }
        if self.skip_list.contains(&id)? {
            tracing::debug!(player, year, "Year is on the skip list");
            return Ok(YearOutcome::AlreadySkipped);
        }

        let mut months: BTreeMap<String, Vec<CanonicalGame>> = BTreeMap::new();

        for month in 1..=12 {
            if self.is_future(year, month) {
                continue;
            }

            let raw = self.fetcher.fetch_month(player, year, month).await;
            if raw.is_empty() {
                tracing::debug!(player, year, month, "No games");
                continue;
            }

            match normalize_month(player, year, month, raw) {
                Ok(games) => {
                    tracing::info!(player, year, month, games = games.len(), "Month fetched");
                    if !games.is_empty() {
                        months.insert(format!("{:02}", month), games);
                    }
                }
                Err(e) => match self.policy {
                    MissingPgnPolicy::SkipYear => {
                        tracing::warn!(player, year, month, "Skipping year: {}", e);
                        self.skip_list.append(&id)?;
                        return Ok(YearOutcome::MarkedUnusable { month });
                    }
                    MissingPgnPolicy::SkipMonth => {
                        tracing::warn!(player, year, month, "Skipping month: {}", e);
                    }
                },
            }
        }

        if months.is_empty() {
            tracing::info!(player, year, "No games this year, adding to skip list");
            self.skip_list.append(&id)?;
            return Ok(YearOutcome::MarkedEmpty);
        }

        let month_count = months.len();
        let game_count = months.values().map(Vec::len).sum();

        let mut archive = YearArchive::new();
        archive.insert(year, months);
        let path = self.archives.save(player, year, &archive)?;

        tracing::info!(
            player,
            year,
            months = month_count,
            games = game_count,
            path = %path.display(),
            "Year archived"
        );
        Ok(YearOutcome::Archived {
            months: month_count,
            games: game_count,
        })
    }

    fn is_future(&self, year: i32, month: u32) -> bool {
        (year, month) > (self.today.year(), self.today.month())
    }
}

/// Normalize every game in a month's listing, in listing order.
///
/// Partially decoded games are kept; games with no move text at all are
/// dropped. A game without a `pgn` field aborts the month.
fn normalize_month(
    player: &str,
    year: i32,
    month: u32,
    raw: Vec<RawGame>,
) -> Result<Vec<CanonicalGame>, MissingPgn> {
    let mut games = Vec::with_capacity(raw.len());

    for (index, game) in raw.into_iter().enumerate() {
        let Some(pgn) = game.pgn else {
            return Err(MissingPgn {
                index,
                url: game.url,
            });
        };

        match normalize(&pgn) {
            Ok(Normalized::Complete(canonical)) => games.push(canonical),
            Ok(Normalized::Partial {
                game: partial,
                errors,
            }) => {
                tracing::debug!(
                    player,
                    year,
                    month,
                    index,
                    skipped_segments = errors.len(),
                    "Game partially normalized"
                );
                games.push(partial);
            }
            Err(e) => {
                tracing::warn!(player, year, month, index, url = ?game.url, "Dropping game: {}", e);
            }
        }
    }

    Ok(games)
}
