use crate::persistence::PersistenceError;

/// What to do when a month's listing contains a game without move text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPgnPolicy {
    /// Skip-list the whole year and stop fetching it.
    #[default]
    SkipYear,
    /// Drop only the offending month and carry on with the rest of the year.
    SkipMonth,
}

/// How a single player/year ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearOutcome {
    /// An archive file was already present; nothing fetched.
    AlreadyArchived,
    /// The year was already on the skip list; nothing fetched.
    AlreadySkipped,
    /// An archive file was written.
    Archived { months: usize, games: usize },
    /// No month had any games; added to the skip list.
    MarkedEmpty,
    /// A game without move text was found in `month`; added to the skip list.
    MarkedUnusable { month: u32 },
}

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("persistence failed: {0}")]
    Persistence(#[from] PersistenceError),
}

/// A listing entry without a `pgn` field.
#[derive(Debug, thiserror::Error)]
#[error("game {index} has no pgn (url: {url:?})")]
pub(crate) struct MissingPgn {
    pub index: usize,
    pub url: Option<String>,
}
