use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chess_archiver::{ArchiverConfig, Fleet, MissingPgnPolicy, Population};
use chess_client::ChessComClient;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Download and normalize chess game archives, one JSON file per player/year.
///
/// With no arguments every titled player is archived from 2007 through the
/// current year.
#[derive(Parser)]
#[command(name = "chess-archiver", version)]
struct Cli {
    /// Archive only this player instead of the titled population.
    #[arg(long, conflicts_with = "title")]
    player: Option<String>,

    /// Title to archive (repeatable). Defaults to every common title.
    #[arg(long = "title", value_name = "TITLE")]
    title: Vec<String>,

    /// First year to archive.
    #[arg(long)]
    start_year: Option<i32>,

    /// Last year to archive (inclusive). Defaults to the current year.
    #[arg(long)]
    end_year: Option<i32>,

    /// Number of players archived concurrently.
    #[arg(long)]
    workers: Option<usize>,

    /// Root directory for archives and the skip list.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Seconds to wait after a failed remote lookup.
    #[arg(long)]
    backoff_secs: Option<u64>,

    /// Drop only the affected month when a game has no PGN, instead of the
    /// whole year.
    #[arg(long)]
    skip_month_on_missing_pgn: bool,

    /// Also write logs to daily-rotated files in this directory.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> ArchiverConfig {
        let mut config = ArchiverConfig::default();

        if let Some(player) = self.player {
            config.population = Population::Single(player);
        } else if !self.title.is_empty() {
            config.population = Population::Titled(self.title);
        }

        let start = self.start_year.unwrap_or(*config.years.start());
        let end = self.end_year.unwrap_or(*config.years.end());
        config.years = start..=end;

        if let Some(workers) = self.workers {
            config.worker_count = workers;
        }
        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if let Some(secs) = self.backoff_secs {
            config.backoff = Duration::from_secs(secs);
        }
        if self.skip_month_on_missing_pgn {
            config.missing_pgn_policy = MissingPgnPolicy::SkipMonth;
        }
        config
    }
}

/// Install the global subscriber. The returned guard flushes the file writer
/// on drop and must live until exit.
fn init_tracing(log_dir: Option<&PathBuf>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false);

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            let file_appender = tracing_appender::rolling::daily(dir, "chess-archiver");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            tracing_subscriber::registry()
                .with(stdout_layer)
                .with(
                    fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_target(true)
                        .with_line_number(true),
                )
                .with(filter)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(stdout_layer)
                .with(filter)
                .init();
            Ok(None)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_dir.as_ref())?;

    let config = cli.into_config();
    config.validate().context("invalid configuration")?;

    tracing::info!(
        data_dir = %config.data_dir.display(),
        first_year = *config.years.start(),
        last_year = *config.years.end(),
        workers = config.worker_count,
        population = ?config.population,
        "Starting chess archiver"
    );

    let client = ChessComClient::new(&config.api_base, &config.user_agent)
        .context("building HTTP client")?;
    let today = chrono::Local::now().date_naive();
    let fleet = Fleet::from_config(&config, Arc::new(client), today);

    let summary = fleet.run(&config.population).await;

    for (player, error) in &summary.failed_players {
        tracing::error!(player = %player, "Player not fully archived: {}", error);
    }
    if !summary.is_success() {
        anyhow::bail!(
            "{} of {} players could not be fully archived",
            summary.failed_players.len(),
            summary.players
        );
    }

    tracing::info!("Archive run complete");
    Ok(())
}
