//! Shared handle to one settings file

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::store;
use crate::error::{Result, SettingsError};

/// Save attempts before a write is reported as failed
pub const SAVE_ATTEMPTS: usize = 3;
/// Pause after the first failed attempt, growing linearly with each retry
pub const SAVE_BACKOFF: Duration = Duration::from_millis(25);

/// In-memory record of one JSON file plus its path
///
/// Every configurator that writes to the same file holds the same
/// `Arc<ConfigFile>`; the mutex is held across mutate + save so writes to
/// one path never interleave.
#[derive(Debug)]
pub struct ConfigFile<R> {
    path: PathBuf,
    record: Mutex<R>,
}

impl<R> ConfigFile<R>
where
    R: Serialize + DeserializeOwned,
{
    /// Load the record at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Arc<Self>> {
        let path = path.into();
        let record = store::load(&path).map_err(|source| SettingsError::ConfigLoadFailed {
            path: path.clone(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(Arc::new(Self {
            path,
            record: Mutex::new(record),
        }))
    }

    /// Wrap an already-built record without touching the disk
    pub fn with_record(path: impl Into<PathBuf>, record: R) -> Arc<Self> {
        Arc::new(Self {
            path: path.into(),
            record: Mutex::new(record),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        f(&*self.lock())
    }

    /// Mutate the record and immediately rewrite the whole file
    ///
    /// The in-memory record keeps the change even when saving fails, so the
    /// next successful save still writes it.
    pub fn update(&self, f: impl FnOnce(&mut R)) -> Result<()> {
        let mut record = self.lock();
        f(&mut *record);
        self.write(&record)
    }

    /// Rewrite the file from the current record
    pub fn save(&self) -> Result<()> {
        let record = self.lock();
        self.write(&record)
    }

    fn write(&self, record: &R) -> Result<()> {
        let mut attempt = 1;
        loop {
            match store::save(&self.path, record) {
                Ok(()) => return Ok(()),
                Err(err) if attempt < SAVE_ATTEMPTS => {
                    log::warn!(
                        "Saving {} failed (attempt {}/{}): {}",
                        self.path.display(),
                        attempt,
                        SAVE_ATTEMPTS,
                        err
                    );
                    thread::sleep(SAVE_BACKOFF * attempt as u32);
                    attempt += 1;
                }
                Err(source) => {
                    log::error!("Giving up on saving {}: {}", self.path.display(), source);
                    return Err(SettingsError::ConfigSaveFailed {
                        path: self.path.clone(),
                        source,
                    });
                }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, R> {
        self.record.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    type Levels = BTreeMap<String, u8>;

    #[test]
    fn test_open_missing_file_fails_loudly() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigFile::<Levels>::open(dir.path().join("Saved.json")).unwrap_err();
        assert!(matches!(err, SettingsError::ConfigLoadFailed { .. }));
    }

    #[test]
    fn test_update_is_durable_before_next_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Saved.json");
        std::fs::write(&path, r#"{"Textures": 1, "Models": 2}"#).unwrap();

        let file = ConfigFile::<Levels>::open(&path).unwrap();
        file.update(|r| {
            r.insert("Textures".into(), 4);
        })
        .unwrap();

        let on_disk: Levels = store::load(&path).unwrap();
        assert_eq!(on_disk["Textures"], 4);
        assert_eq!(on_disk["Models"], 2);
        assert_eq!(file.read(|r| r["Textures"]), 4);
    }

    #[test]
    fn test_failed_save_keeps_value_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone").join("Saved.json");
        let file = ConfigFile::with_record(&path, Levels::new());

        let err = file
            .update(|r| {
                r.insert("Effects".into(), 5);
            })
            .unwrap_err();
        assert!(matches!(err, SettingsError::ConfigSaveFailed { .. }));
        assert_eq!(file.read(|r| r.get("Effects").copied()), Some(5));

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        file.save().unwrap();
        let on_disk: Levels = store::load(&path).unwrap();
        assert_eq!(on_disk["Effects"], 5);
    }

    #[test]
    fn test_retries_back_off_between_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let file = ConfigFile::with_record(dir.path().join("gone").join("Saved.json"), Levels::new());

        let started = std::time::Instant::now();
        assert!(file.save().is_err());
        let waited: Duration = (1..SAVE_ATTEMPTS as u32).map(|n| SAVE_BACKOFF * n).sum();
        assert!(started.elapsed() >= waited);
    }
}
