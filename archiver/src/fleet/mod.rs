pub mod types;
pub mod worker;

pub use crate::config::Population;
pub use types::{FleetSummary, PlayerJob, PlayerReport};

use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::sync::Arc;

use chess_client::GameSource;
use chrono::NaiveDate;
use tokio::sync::{mpsc, Mutex};

use crate::archive::YearArchiver;
use crate::config::ArchiverConfig;
use crate::fetch::{DirectoryFetcher, MonthFetcher};
use crate::persistence::{ArchiveStore, SkipList};
use crate::progress::Progress;

/// Runs the year archiver for a whole population of players.
///
/// Owns a fixed pool of worker tasks fed from a bounded job queue (mpsc
/// channel). Each worker takes one player at a time and walks that player's
/// years oldest first, so no two workers ever touch the same player.
pub struct Fleet<S> {
    archiver: Arc<YearArchiver<S>>,
    directory: DirectoryFetcher<S>,
    years: RangeInclusive<i32>,
    worker_count: usize,
}

impl<S: GameSource + 'static> Fleet<S> {
    pub fn new(
        archiver: YearArchiver<S>,
        directory: DirectoryFetcher<S>,
        years: RangeInclusive<i32>,
        worker_count: usize,
    ) -> Self {
        Self {
            archiver: Arc::new(archiver),
            directory,
            years,
            worker_count,
        }
    }

    /// Wire up a fleet from configuration. `today` bounds which months are
    /// requested.
    pub fn from_config(config: &ArchiverConfig, source: Arc<S>, today: NaiveDate) -> Self {
        let archiver = YearArchiver::new(
            MonthFetcher::new(source.clone(), config.backoff),
            ArchiveStore::new(config.archive_dir()),
            SkipList::new(config.skip_list_path()),
            config.missing_pgn_policy,
            today,
        );
        let directory = DirectoryFetcher::new(source, config.backoff);
        Self::new(archiver, directory, config.years.clone(), config.worker_count)
    }

    /// Expand a population into a sorted, de-duplicated list of usernames.
    ///
    /// A title whose directory lookup fails contributes nobody.
    pub async fn resolve_population(&self, population: &Population) -> Vec<String> {
        match population {
            Population::Single(player) => vec![player.clone()],
            Population::Titled(titles) => {
                let mut players = BTreeSet::new();
                for title in titles {
                    let found = self.directory.titled_players(title).await;
                    tracing::info!(title = %title, players = found.len(), "Title resolved");
                    players.extend(found);
                }
                players.into_iter().collect()
            }
        }
    }

    /// Resolve the population and archive every player in it.
    pub async fn run(&self, population: &Population) -> FleetSummary {
        let players = self.resolve_population(population).await;
        self.run_players(players).await
    }

    /// Archive every year of every listed player and wait for all workers.
    pub async fn run_players(&self, players: Vec<String>) -> FleetSummary {
        if players.is_empty() {
            tracing::warn!("No players to archive");
            return FleetSummary::default();
        }

        let worker_count = self.worker_count.clamp(1, players.len());
        let progress = Arc::new(Progress::new(players.len()));
        let (job_tx, job_rx) = mpsc::channel::<PlayerJob>(worker_count);

        // Each worker calls rx.lock().await.recv().await, so only one
        // worker picks up each job.
        let shared_rx = Arc::new(Mutex::new(job_rx));

        let mut handles = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let rx = shared_rx.clone();
            let archiver = self.archiver.clone();
            let years = self.years.clone();
            let progress = progress.clone();
            handles.push(tokio::spawn(async move {
                worker::run_player_worker(worker_id, rx, archiver, years, progress).await
            }));
        }

        tracing::info!(
            worker_count,
            players = players.len(),
            first_year = *self.years.start(),
            last_year = *self.years.end(),
            "Fleet started"
        );

        for player in players {
            if job_tx.send(PlayerJob { player }).await.is_err() {
                tracing::error!("All workers exited before the queue was drained");
                break;
            }
        }
        drop(job_tx);

        let mut summary = FleetSummary::default();
        for handle in handles {
            match handle.await {
                Ok(reports) => {
                    for report in reports {
                        summary.record(report);
                    }
                }
                Err(e) => tracing::error!("Archive worker panicked: {}", e),
            }
        }

        tracing::info!(
            players = summary.players,
            archived_years = summary.archived_years,
            archived_games = summary.archived_games,
            empty_years = summary.empty_years,
            unusable_years = summary.unusable_years,
            cached_years = summary.cached_years,
            failed_players = summary.failed_players.len(),
            "Fleet finished"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chess_client::{ClientResult, MockCall, MockGameSource, RawGame};
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    /// Answers every month with no games after a short delay, recording how
    /// many distinct players have a request in flight at once.
    #[derive(Default)]
    struct InFlightSource {
        in_flight: std::sync::Mutex<HashMap<String, usize>>,
        peak_players: AtomicUsize,
        same_player_overlap: AtomicBool,
    }

    #[async_trait]
    impl GameSource for InFlightSource {
        async fn month_games(
            &self,
            player: &str,
            _year: i32,
            _month: u32,
        ) -> ClientResult<Vec<RawGame>> {
            {
                let mut in_flight = self.in_flight.lock().unwrap();
                let count = in_flight.entry(player.to_string()).or_default();
                *count += 1;
                if *count > 1 {
                    self.same_player_overlap.store(true, Ordering::SeqCst);
                }
                self.peak_players.fetch_max(in_flight.len(), Ordering::SeqCst);
            }

            tokio::time::sleep(Duration::from_millis(2)).await;

            let mut in_flight = self.in_flight.lock().unwrap();
            if let Some(count) = in_flight.get_mut(player) {
                *count -= 1;
                if *count == 0 {
                    in_flight.remove(player);
                }
            }
            Ok(Vec::new())
        }

        async fn titled_players(&self, _title: &str) -> ClientResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    const GAME: &str = "[Event \"Live Chess\"]\n\n1. e4 e5 2. Nf3 Nc6 1/2-1/2";

    fn fleet(mock: &MockGameSource, data_dir: &Path, worker_count: usize) -> Fleet<MockGameSource> {
        let config = ArchiverConfig {
            years: 2020..=2021,
            worker_count,
            backoff: Duration::ZERO,
            data_dir: data_dir.to_path_buf(),
            ..ArchiverConfig::default()
        };
        let today = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        Fleet::from_config(&config, Arc::new(mock.clone()), today)
    }

    #[tokio::test]
    async fn test_resolve_titled_population_dedupes_and_sorts() {
        let mock = MockGameSource::new()
            .with_titled("GM", &["carol", "alice"])
            .with_titled("IM", &["bob", "alice"])
            .with_titled_error("FM");
        let dir = tempfile::tempdir().unwrap();
        let fleet = fleet(&mock, dir.path(), 2);

        let population = Population::Titled(vec!["GM".into(), "IM".into(), "FM".into()]);
        let players = fleet.resolve_population(&population).await;
        assert_eq!(players, ["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn test_resolve_single_player_skips_directory() {
        let mock = MockGameSource::new();
        let dir = tempfile::tempdir().unwrap();
        let fleet = fleet(&mock, dir.path(), 2);

        let players = fleet
            .resolve_population(&Population::Single("hikaru".to_string()))
            .await;
        assert_eq!(players, ["hikaru"]);
        assert!(mock.get_calls().is_empty());
    }

    #[tokio::test]
    async fn test_run_players_covers_every_player_year() {
        let mock = MockGameSource::new()
            .with_month("alice", 2020, 3, vec![RawGame::from_pgn(GAME)])
            .with_month("bob", 2021, 11, vec![RawGame::from_pgn(GAME), RawGame::from_pgn(GAME)]);
        let dir = tempfile::tempdir().unwrap();
        let fleet = fleet(&mock, dir.path(), 2);

        let summary = fleet
            .run_players(vec!["alice".into(), "bob".into(), "carol".into()])
            .await;

        assert!(summary.is_success());
        assert_eq!(summary.players, 3);
        assert_eq!(summary.archived_years, 2);
        assert_eq!(summary.archived_games, 3);
        assert_eq!(summary.empty_years, 4);
        for player in ["alice", "bob", "carol"] {
            assert_eq!(mock.month_calls_for(player), 24);
        }
        assert!(dir.path().join("archives").join("alice-2020.json").exists());
        assert!(dir.path().join("archives").join("bob-2021.json").exists());
    }

    #[tokio::test]
    async fn test_second_run_makes_no_month_calls() {
        let mock = MockGameSource::new().with_month("alice", 2021, 1, vec![RawGame::from_pgn(GAME)]);
        let dir = tempfile::tempdir().unwrap();
        let fleet = fleet(&mock, dir.path(), 1);

        fleet.run_players(vec!["alice".into()]).await;
        mock.clear_calls();

        let summary = fleet.run_players(vec!["alice".into()]).await;
        assert_eq!(summary.cached_years, 2);
        assert!(mock.get_calls().is_empty());
    }

    #[tokio::test]
    async fn test_persistence_failure_abandons_player() {
        let mock = MockGameSource::new()
            .with_month("alice", 2020, 5, vec![RawGame::from_pgn(GAME)])
            .with_month("alice", 2021, 5, vec![RawGame::from_pgn(GAME)]);
        let dir = tempfile::tempdir().unwrap();
        // A plain file where the archive directory should be
        std::fs::write(dir.path().join("archives"), "not a directory").unwrap();
        let fleet = fleet(&mock, dir.path(), 2);

        let summary = fleet.run_players(vec!["alice".into(), "bob".into()]).await;

        assert!(!summary.is_success());
        assert_eq!(summary.failed_players.len(), 1);
        assert_eq!(summary.failed_players[0].0, "alice");
        // 2021 was never attempted
        assert_eq!(mock.month_calls_for("alice"), 12);
        assert!(!mock
            .get_calls()
            .contains(&MockCall::MonthGames {
                player: "alice".to_string(),
                year: 2021,
                month: 1
            }));
        // bob had nothing to write, so his years reached the skip list
        assert_eq!(summary.empty_years, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_at_most_worker_count_players_in_flight() {
        let source = Arc::new(InFlightSource::default());
        let dir = tempfile::tempdir().unwrap();
        let config = ArchiverConfig {
            years: 2020..=2021,
            worker_count: 3,
            backoff: Duration::ZERO,
            data_dir: dir.path().to_path_buf(),
            ..ArchiverConfig::default()
        };
        let today = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let fleet = Fleet::from_config(&config, source.clone(), today);

        let players: Vec<String> = (0..30).map(|i| format!("player{i:02}")).collect();
        let summary = fleet.run_players(players).await;

        assert_eq!(summary.players, 30);
        assert_eq!(summary.empty_years, 60);
        let peak = source.peak_players.load(Ordering::SeqCst);
        assert!((1..=3).contains(&peak), "peak players in flight: {peak}");
        assert!(!source.same_player_overlap.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_empty_player_list_is_a_no_op() {
        let mock = MockGameSource::new();
        let dir = tempfile::tempdir().unwrap();
        let summary = fleet(&mock, dir.path(), 4).run_players(Vec::new()).await;
        assert_eq!(summary, FleetSummary::default());
    }
}
