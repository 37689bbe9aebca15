use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

use super::KeyValueStore;

/// One `<key>.json` file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<data_dir>/chainbreaker`, falling back to the working directory.
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chainbreaker")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn item_path(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.item_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.item_path(key), value)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.item_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn scratch_store() -> FileStore {
        FileStore::new(std::env::temp_dir().join(format!("chainbreaker-test-{}", Uuid::new_v4())))
    }

    #[test]
    fn test_round_trip_through_files() {
        let store = scratch_store();
        assert_eq!(store.get_item("chainbreaker-game-state").unwrap(), None);

        store.set_item("chainbreaker-game-state", "{}").unwrap();
        assert!(store.dir().join("chainbreaker-game-state.json").exists());
        assert_eq!(
            store.get_item("chainbreaker-game-state").unwrap().as_deref(),
            Some("{}")
        );

        store.remove_item("chainbreaker-game-state").unwrap();
        assert_eq!(store.get_item("chainbreaker-game-state").unwrap(), None);
        store.remove_item("chainbreaker-game-state").unwrap();

        let _ = fs::remove_dir_all(store.dir());
    }

    #[test]
    fn test_key_cannot_escape_directory() {
        let store = scratch_store();
        assert_eq!(
            store.item_path("../evil"),
            store.dir().join(".._evil.json")
        );
    }
}
