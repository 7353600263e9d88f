mod archive_store;
mod skip_list;

pub use archive_store::{ArchiveStore, YearArchive};
pub use skip_list::SkipList;

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Identifier of one player's year of games, shared by the archive file name
/// and the skip list: `{player}-{year}.json`.
pub fn dataset_id(player: &str, year: i32) -> String {
    format!("{}-{}.json", player, year)
}
