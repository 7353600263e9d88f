use crate::archive::YearOutcome;

/// A player waiting for a worker.
#[derive(Debug, Clone)]
pub struct PlayerJob {
    pub player: String,
}

/// What happened to each of one player's years.
#[derive(Debug, Clone)]
pub struct PlayerReport {
    pub player: String,
    pub years: Vec<(i32, YearOutcome)>,
    /// Set when a persistence error ended this player's run early.
    pub error: Option<String>,
}

impl PlayerReport {
    pub fn new(player: &str) -> Self {
        Self {
            player: player.to_string(),
            years: Vec::new(),
            error: None,
        }
    }
}

/// Totals across a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FleetSummary {
    pub players: usize,
    pub archived_years: usize,
    pub archived_games: usize,
    pub empty_years: usize,
    pub unusable_years: usize,
    /// Years already archived or skip-listed before this run.
    pub cached_years: usize,
    /// (player, error) for every player whose run was cut short.
    pub failed_players: Vec<(String, String)>,
}

impl FleetSummary {
    pub fn record(&mut self, report: PlayerReport) {
        self.players += 1;
        for (_, outcome) in &report.years {
            match outcome {
                YearOutcome::Archived { games, .. } => {
                    self.archived_years += 1;
                    self.archived_games += games;
                }
                YearOutcome::MarkedEmpty => self.empty_years += 1,
                YearOutcome::MarkedUnusable { .. } => self.unusable_years += 1,
                YearOutcome::AlreadyArchived | YearOutcome::AlreadySkipped => {
                    self.cached_years += 1
                }
            }
        }
        if let Some(error) = report.error {
            self.failed_players.push((report.player, error));
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed_players.is_empty()
    }
}
