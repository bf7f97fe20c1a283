use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;

use crate::store::StateStore;

/// Filesystem store: one JSON file per key under the platform data dir.
/// Writes go to a temp file first and are renamed into place so a crash
/// mid-save never leaves a truncated blob.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("prepdrill");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }
}

impl StateStore for JsonStore {
    fn load_raw(&self, key: &str) -> Result<Option<String>> {
        let path = self.file_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn save_raw(&self, key: &str, json: &str) -> Result<()> {
        let path = self.file_path(key);
        let tmp_path = path.with_extension("tmp");

        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.file_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::ExamHistoryData;
    use crate::store::{EXAM_HISTORY_KEY, load_optional, load_or_default, save};
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_absent_key_loads_none() {
        let (_dir, store) = make_test_store();
        assert_eq!(store.load_raw("nothing").unwrap(), None);
    }

    #[test]
    fn test_history_round_trip() {
        let (_dir, store) = make_test_store();
        let history = ExamHistoryData::default();
        save(&store, EXAM_HISTORY_KEY, &history).unwrap();

        let loaded: ExamHistoryData = load_or_default(&store, EXAM_HISTORY_KEY).unwrap();
        assert_eq!(loaded.schema_version, history.schema_version);
        assert!(loaded.sessions.is_empty());
    }

    #[test]
    fn test_save_leaves_no_tmp_file() {
        let (dir, store) = make_test_store();
        store.save_raw("state", "{}").unwrap();

        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty(), "no residual .tmp files");
        assert!(store.file_path("state").exists());
    }

    #[test]
    fn test_corrupt_file_surfaces_as_error() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path("history"), "not json at all").unwrap();

        let result: anyhow::Result<Option<ExamHistoryData>> = load_optional(&store, "history");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("corrupt"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (_dir, store) = make_test_store();
        store.save_raw("gone", "{}").unwrap();
        store.remove("gone").unwrap();
        store.remove("gone").unwrap();
        assert_eq!(store.load_raw("gone").unwrap(), None);
    }
}
