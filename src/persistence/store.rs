//! Read and write whole JSON records

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::LoadError;

/// Read and parse a JSON record
pub fn load<R: DeserializeOwned>(path: &Path) -> Result<R, LoadError> {
    let json = fs::read_to_string(path)?;
    let record = serde_json::from_str(&json)?;
    log::debug!("Loaded {}", path.display());
    Ok(record)
}

/// Serialize `record` and replace the file at `path` with it
///
/// The JSON is written to a sibling `.tmp` file, flushed to disk and then
/// renamed over the target, so readers see either the old or the new file.
pub fn save<R: Serialize>(path: &Path, record: &R) -> io::Result<()> {
    let json = serde_json::to_string_pretty(record)?;
    let tmp = temp_path(path);

    let written = File::create(&tmp).and_then(|mut file| {
        file.write_all(json.as_bytes())?;
        file.sync_all()
    });
    if let Err(err) = written.and_then(|()| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }

    log::debug!("Saved {} ({} bytes)", path.display(), json.len());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("settings"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load::<BTreeMap<String, u8>>(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{\"Master\": ").unwrap();
        let err = load::<BTreeMap<String, u8>>(&path).unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn test_save_replaces_file_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Saved.json");
        fs::write(&path, "{\"old\": 1}").unwrap();

        let mut record = BTreeMap::new();
        record.insert("Textures".to_string(), 3u8);
        save(&path, &record).unwrap();

        let loaded: BTreeMap<String, u8> = load(&path).unwrap();
        assert_eq!(loaded, record);
        assert!(!dir.path().join("Saved.json.tmp").exists());
    }

    #[test]
    fn test_round_trip_preserves_semantic_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Saved.json");
        fs::write(
            &path,
            r#"{"Master":{"Volume":5.0,"IsMuted":false},"Music":{"Volume":-10.5,"IsMuted":true}}"#,
        )
        .unwrap();

        let first: serde_json::Value = load(&path).unwrap();
        save(&path, &first).unwrap();
        let second: serde_json::Value = load(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("Saved.json");
        assert!(save(&path, &1u8).is_err());
    }
}
