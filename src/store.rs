use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::error::StoreError;
use crate::models::Db;

pub const DEFAULT_DB_PATH: &str = "data/db.json";

/// JSON file holding the whole task store.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // A missing file is an empty store.
    pub fn load(&self) -> Result<Db, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "store file missing, starting empty");
                return Ok(Db::default());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, db: &Db) -> Result<(), StoreError> {
        let tmp_path = self.path.with_extension("json.tmp");
        let text = serde_json::to_string_pretty(db)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&tmp_path, text)?;
        fs::rename(&tmp_path, &self.path)?;
        debug!(path = %self.path.display(), tasks = db.tasks.len(), "store saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, Task, TaskStatus};
    use chrono::DateTime;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("nope.json"));
        assert_eq!(store.path(), dir.path().join("nope.json"));
        let db = store.load().unwrap();
        assert!(db.tasks.is_empty());
        assert_eq!(db.next_id, 1);
    }

    #[test]
    fn save_then_load_keeps_tasks() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("nested").join("db.json"));
        let now = DateTime::parse_from_rfc3339("2025-03-01T09:00:00+09:00").unwrap();

        let mut db = Db::default();
        db.tasks.push(Task {
            id: 1,
            title: "pay rent".into(),
            description: String::new(),
            priority: Priority::High,
            status: TaskStatus::Todo,
            due_date: Some(now),
            created_at: now,
            updated_at: now,
            is_completed: false,
        });
        db.next_id = 2;
        store.save(&db).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.next_id, 2);
        assert_eq!(loaded.tasks, db.tasks);
        assert!(!dir.path().join("nested").join("db.json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(JsonStore::new(path).load(), Err(StoreError::Format(_))));
    }
}
