use std::ops::RangeInclusive;
use std::sync::Arc;

use chess_client::GameSource;
use tokio::sync::{mpsc, Mutex};

use crate::archive::YearArchiver;
use crate::progress::Progress;

use super::types::{PlayerJob, PlayerReport};

/// A long-lived worker task. Receives players from the shared channel and
/// runs each one's full year range before taking the next.
pub async fn run_player_worker<S: GameSource>(
    worker_id: usize,
    job_rx: Arc<Mutex<mpsc::Receiver<PlayerJob>>>,
    archiver: Arc<YearArchiver<S>>,
    years: RangeInclusive<i32>,
    progress: Arc<Progress>,
) -> Vec<PlayerReport> {
    tracing::info!(worker_id, "Archive worker started");
    let mut reports = Vec::new();

    loop {
        // Only one worker picks up each job
        let job = {
            let mut rx = job_rx.lock().await;
            match rx.recv().await {
                Some(job) => job,
                None => {
                    tracing::info!(worker_id, "Job channel closed, worker exiting");
                    break;
                }
            }
        };

        tracing::info!(worker_id, player = %job.player, "Archiving player");
        let report = archive_player(worker_id, &job.player, archiver.as_ref(), years.clone()).await;
        progress.player_done(worker_id, &job.player);
        reports.push(report);
    }

    reports
}

/// Run every year for one player, oldest first. A persistence error ends
/// the player's run; later years are left for a future run.
async fn archive_player<S: GameSource>(
    worker_id: usize,
    player: &str,
    archiver: &YearArchiver<S>,
    years: RangeInclusive<i32>,
) -> PlayerReport {
    let mut report = PlayerReport::new(player);

    for year in years {
        match archiver.archive_year(player, year).await {
            Ok(outcome) => report.years.push((year, outcome)),
            Err(e) => {
                tracing::error!(worker_id, player, year, "Archiving failed, abandoning player: {}", e);
                report.error = Some(format!("{}: {}", year, e));
                break;
            }
        }
    }

    report
}
