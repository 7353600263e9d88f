use super::PersistenceError;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Append-only list of datasets known to be empty or unusable.
///
/// Plain text, one identifier per line. Every worker appends with a single
/// write on a file opened in append mode, so no lock is taken; readers see
/// at worst a slightly stale list.
pub struct SkipList {
    path: PathBuf,
}

impl SkipList {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `id` is listed. A missing file is an empty list.
    pub fn contains(&self, id: &str) -> Result<bool, PersistenceError> {
        Ok(self.entries()?.iter().any(|entry| entry == id))
    }

    pub fn entries(&self) -> Result<Vec<String>, PersistenceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(contents.lines().map(String::from).collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn append(&self, id: &str) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(format!("{}\n", id).as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let list = SkipList::new(dir.path().join("skip_list.txt"));
        assert!(!list.contains("alice-2020.json").unwrap());
        assert!(list.entries().unwrap().is_empty());
    }

    #[test]
    fn test_append_then_contains() {
        let dir = tempfile::tempdir().unwrap();
        let list = SkipList::new(dir.path().join("nested").join("skip_list.txt"));
        list.append("alice-2020.json").unwrap();
        list.append("bob-2021.json").unwrap();

        assert!(list.contains("alice-2020.json").unwrap());
        assert!(list.contains("bob-2021.json").unwrap());
        assert_eq!(
            std::fs::read_to_string(list.path()).unwrap(),
            "alice-2020.json\nbob-2021.json\n"
        );
    }

    #[test]
    fn test_contains_is_exact_match() {
        let dir = tempfile::tempdir().unwrap();
        let list = SkipList::new(dir.path().join("skip_list.txt"));
        list.append("alice-2020.json").unwrap();

        assert!(!list.contains("alice-2020").unwrap());
        assert!(!list.contains("malice-2020.json").unwrap());
        assert!(!list.contains("lice-2020.json").unwrap());
    }

    #[test]
    fn test_concurrent_appends_keep_whole_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skip_list.txt");

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let list = SkipList::new(path);
                    for year in 2000..2025 {
                        list.append(&format!("player{worker}-{year}.json")).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let entries = SkipList::new(path).entries().unwrap();
        assert_eq!(entries.len(), 8 * 25);
        assert!(entries
            .iter()
            .all(|e| e.starts_with("player") && e.ends_with(".json")));
    }
}
