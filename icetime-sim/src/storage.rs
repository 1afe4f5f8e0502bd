use icetime_game::{RosterStorage, SaveDocument, SaveError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ROSTER_FILE: &str = "roster.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("roster file {path} is invalid: {source}")]
    Roster {
        path: PathBuf,
        #[source]
        source: SaveError,
    },
}

/// Roster document kept as `roster.json` inside a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn roster_path(&self) -> PathBuf {
        self.dir.join(ROSTER_FILE)
    }

    fn io_error(path: &Path, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl RosterStorage for JsonFileStorage {
    type Error = StorageError;

    fn load_roster(&self) -> Result<Option<SaveDocument>, Self::Error> {
        let path = self.roster_path();
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(Self::io_error(&path, err)),
        };
        SaveDocument::from_json(&json)
            .map(Some)
            .map_err(|source| StorageError::Roster { path, source })
    }

    fn save_roster(&self, roster: &SaveDocument) -> Result<(), Self::Error> {
        fs::create_dir_all(&self.dir).map_err(|err| Self::io_error(&self.dir, err))?;
        let path = self.roster_path();
        let json = roster
            .to_json()
            .map_err(|source| StorageError::Roster {
                path: path.clone(),
                source,
            })?;
        fs::write(&path, json).map_err(|err| Self::io_error(&path, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icetime_game::LeagueEngine;

    fn temp_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "icetime-storage-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn missing_file_loads_as_none() {
        let storage = JsonFileStorage::new(temp_dir("missing"));
        assert!(storage.load_roster().unwrap().is_none());
    }

    #[test]
    fn saved_roster_loads_back() {
        let dir = temp_dir("roundtrip");
        let storage = JsonFileStorage::new(&dir);
        let roster = LeagueEngine::new(storage.clone())
            .prepare_roster(3, true, 4)
            .unwrap();
        assert!(storage.roster_path().is_file());
        let loaded = storage.load_roster().unwrap().expect("roster saved");
        assert_eq!(loaded.teams, roster.teams);
        assert_eq!(loaded.competitors.len(), 18);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = temp_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(ROSTER_FILE), "{ nope").unwrap();
        let storage = JsonFileStorage::new(&dir);
        assert!(matches!(
            storage.load_roster(),
            Err(StorageError::Roster { .. })
        ));
        let _ = fs::remove_dir_all(dir);
    }
}
