use super::{dataset_id, PersistenceError};
use chess::CanonicalGame;
use std::collections::BTreeMap;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// One player's games for a year: year -> two-digit month -> games in the
/// order the archive listed them.
pub type YearArchive = BTreeMap<i32, BTreeMap<String, Vec<CanonicalGame>>>;

/// Directory of archive files, one per player per year.
///
/// A file's existence marks that player/year as done, so files are written
/// under a temporary name and renamed into place once complete.
pub struct ArchiveStore {
    dir: PathBuf,
}

impl ArchiveStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn ensure_dir(&self) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    pub fn file_path(&self, player: &str, year: i32) -> PathBuf {
        self.dir.join(dataset_id(player, year))
    }

    pub fn exists(&self, player: &str, year: i32) -> bool {
        self.file_path(player, year).is_file()
    }

    /// Write a year archive. Returns the final path.
    pub fn save(
        &self,
        player: &str,
        year: i32,
        archive: &YearArchive,
    ) -> Result<PathBuf, PersistenceError> {
        self.ensure_dir()?;
        let path = self.file_path(player, year);
        let tmp_path = path.with_extension("json.tmp");

        let file = std::fs::File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, archive)?;
        writer.flush()?;
        drop(writer);

        std::fs::rename(&tmp_path, &path)?;
        Ok(path)
    }

    /// Load a year archive. Returns None if not found.
    pub fn load(&self, player: &str, year: i32) -> Result<Option<YearArchive>, PersistenceError> {
        let path = self.file_path(player, year);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        let archive = serde_json::from_str(&contents)?;
        Ok(Some(archive))
    }
}
