//! JSON file-based storage implementation.
//!
//! All data is stored as JSON files in a `data/` directory with atomic writes.

use crate::domain::Issue;
use crate::storage::IssueStore;
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const ISSUES_DIR: &str = "data/issues";
const INDEX_FILE: &str = "data/index.json";

/// Index of all issues in the store
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Index {
    /// Schema version for future migrations
    schema_version: u32,
    /// List of all issue IDs
    all_ids: Vec<String>,
}

impl Default for Index {
    fn default() -> Self {
        Self {
            schema_version: 1,
            all_ids: Vec::new(),
        }
    }
}

/// JSON file-based storage for issues.
///
/// Each issue is a separate JSON file in `data/issues/`, tracked by
/// `data/index.json`. All file writes are atomic (write to temp file,
/// then rename); the index read-modify-write is serialized across clones
/// by a shared lock so concurrent saves cannot drop each other's ids.
#[derive(Clone)]
pub struct JsonFileStorage {
    root: PathBuf,
    index_lock: Arc<Mutex<()>>,
}

impl JsonFileStorage {
    /// Create a new JSON file storage instance at the given root path
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            index_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Resolve the file path for an issue id.
    ///
    /// Ids arrive from request bodies, so anything that would escape the
    /// issues directory is rejected rather than resolved.
    fn issue_path(&self, id: &str) -> Result<PathBuf> {
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            bail!("Invalid issue id: {}", id);
        }
        Ok(self.root.join(ISSUES_DIR).join(format!("{}.json", id)))
    }

    fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data).context("Failed to serialize data")?;

        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, json).context("Failed to write temporary file")?;
        fs::rename(&temp_path, path).context("Failed to rename temporary file")?;

        Ok(())
    }

    fn read_json<T: for<'de> Deserialize<'de>>(&self, path: &Path) -> Result<T> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        serde_json::from_str(&contents).context("Failed to deserialize data")
    }

    fn load_index(&self) -> Result<Index> {
        let index_path = self.root.join(INDEX_FILE);
        self.read_json(&index_path)
    }

    fn save_index(&self, index: &Index) -> Result<()> {
        let index_path = self.root.join(INDEX_FILE);
        self.write_json(&index_path, index)
    }
}

impl IssueStore for JsonFileStorage {
    fn init(&self) -> Result<()> {
        let issues_dir = self.root.join(ISSUES_DIR);

        fs::create_dir_all(&issues_dir).context("Failed to create issues directory")?;

        // Create index.json if it doesn't exist
        let index_path = self.root.join(INDEX_FILE);
        if !index_path.exists() {
            let index = Index::default();
            self.write_json(&index_path, &index)?;
        }

        Ok(())
    }

    fn save_issue(&self, issue: &Issue) -> Result<()> {
        let issue_path = self.issue_path(&issue.id)?;
        self.write_json(&issue_path, issue)?;

        // Update index under the shared lock
        let _guard = self
            .index_lock
            .lock()
            .map_err(|_| anyhow!("index lock poisoned"))?;
        let mut index = self.load_index()?;
        if !index.all_ids.contains(&issue.id) {
            index.all_ids.push(issue.id.clone());
            self.save_index(&index)?;
        }

        Ok(())
    }

    fn load_issue(&self, id: &str) -> Result<Issue> {
        let issue_path = self.issue_path(id)?;
        self.read_json(&issue_path)
    }

    fn delete_issue(&self, id: &str) -> Result<()> {
        let issue_path = self.issue_path(id)?;
        fs::remove_file(&issue_path).context("Failed to delete issue file")?;

        // Update index under the shared lock
        let _guard = self
            .index_lock
            .lock()
            .map_err(|_| anyhow!("index lock poisoned"))?;
        let mut index = self.load_index()?;
        index.all_ids.retain(|i| i != id);
        self.save_index(&index)?;

        Ok(())
    }

    fn list_issues(&self) -> Result<Vec<Issue>> {
        let index = self.load_index()?;
        index.all_ids.iter().map(|id| self.load_issue(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_storage() -> (TempDir, JsonFileStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(temp_dir.path());
        (temp_dir, storage)
    }

    fn sample_issue(title: &str) -> Issue {
        Issue::new(
            "apitest".to_string(),
            title.to_string(),
            "Description".to_string(),
            "tester".to_string(),
        )
    }

    #[test]
    fn test_init_creates_directory_structure() {
        let (_temp, storage) = setup_storage();

        storage.init().unwrap();

        assert!(storage.root.join(ISSUES_DIR).exists());
        assert!(storage.root.join(INDEX_FILE).exists());
    }

    #[test]
    fn test_init_is_idempotent() {
        let (_temp, storage) = setup_storage();

        storage.init().unwrap();
        storage.init().unwrap();

        assert!(storage.root.join(ISSUES_DIR).exists());
    }

    #[test]
    fn test_save_and_load_issue() {
        let (_temp, storage) = setup_storage();
        storage.init().unwrap();

        let issue = sample_issue("Test Issue");
        let issue_id = issue.id.clone();

        storage.save_issue(&issue).unwrap();
        let loaded = storage.load_issue(&issue_id).unwrap();

        assert_eq!(loaded.id, issue.id);
        assert_eq!(loaded.issue_title, issue.issue_title);
        assert_eq!(loaded.issue_text, issue.issue_text);
        assert_eq!(loaded.created_on, issue.created_on);
    }

    #[test]
    fn test_save_issue_updates_index() {
        let (_temp, storage) = setup_storage();
        storage.init().unwrap();

        let issue = sample_issue("Test");
        storage.save_issue(&issue).unwrap();

        let index = storage.load_index().unwrap();
        assert!(index.all_ids.contains(&issue.id));
    }

    #[test]
    fn test_save_issue_twice_doesnt_duplicate_in_index() {
        let (_temp, storage) = setup_storage();
        storage.init().unwrap();

        let mut issue = sample_issue("Test");
        storage.save_issue(&issue).unwrap();

        issue.issue_title = "Updated".to_string();
        storage.save_issue(&issue).unwrap();

        let index = storage.load_index().unwrap();
        assert_eq!(
            index.all_ids.iter().filter(|id| *id == &issue.id).count(),
            1
        );

        let loaded = storage.load_issue(&issue.id).unwrap();
        assert_eq!(loaded.issue_title, "Updated");
    }

    #[test]
    fn test_list_issues_returns_all_issues() {
        let (_temp, storage) = setup_storage();
        storage.init().unwrap();

        let issue1 = sample_issue("Issue 1");
        let issue2 = sample_issue("Issue 2");

        storage.save_issue(&issue1).unwrap();
        storage.save_issue(&issue2).unwrap();

        let issues = storage.list_issues().unwrap();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| i.id == issue1.id));
        assert!(issues.iter().any(|i| i.id == issue2.id));
    }

    #[test]
    fn test_delete_issue_removes_file_and_updates_index() {
        let (_temp, storage) = setup_storage();
        storage.init().unwrap();

        let issue = sample_issue("Test");
        let issue_id = issue.id.clone();

        storage.save_issue(&issue).unwrap();
        assert!(storage.issue_path(&issue_id).unwrap().exists());

        storage.delete_issue(&issue_id).unwrap();
        assert!(!storage.issue_path(&issue_id).unwrap().exists());

        let index = storage.load_index().unwrap();
        assert!(!index.all_ids.contains(&issue_id));
    }

    #[test]
    fn test_load_nonexistent_issue_returns_error() {
        let (_temp, storage) = setup_storage();
        storage.init().unwrap();

        let result = storage.load_issue("nonexistent");
        assert!(result.is_err());
    }

    #[test]
    fn test_delete_nonexistent_issue_returns_error() {
        let (_temp, storage) = setup_storage();
        storage.init().unwrap();

        let result = storage.delete_issue("nonexistent");
        assert!(result.is_err());
    }

    #[test]
    fn test_path_style_ids_are_rejected() {
        let (_temp, storage) = setup_storage();
        storage.init().unwrap();

        for id in ["../index", "..", "a/b", "a\\b", "data/issues/x", ""] {
            assert!(storage.load_issue(id).is_err(), "load accepted {:?}", id);
            assert!(storage.delete_issue(id).is_err(), "delete accepted {:?}", id);
        }
    }

    #[test]
    fn test_delete_with_traversal_id_leaves_store_intact() {
        let (_temp, storage) = setup_storage();
        storage.init().unwrap();

        let issue = sample_issue("Keep me");
        storage.save_issue(&issue).unwrap();

        // An id aimed at the index file must not touch it
        assert!(storage.delete_issue("../index").is_err());

        assert!(storage.root.join(INDEX_FILE).exists());
        let issues = storage.list_issues().unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, issue.id);
    }

    #[test]
    fn test_concurrent_saves_keep_every_id_in_index() {
        let (_temp, storage) = setup_storage();
        storage.init().unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let storage = storage.clone();
                std::thread::spawn(move || {
                    let issue = sample_issue(&format!("Issue {}", i));
                    storage.save_issue(&issue).unwrap();
                    issue.id
                })
            })
            .collect();

        let ids: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let issues = storage.list_issues().unwrap();
        assert_eq!(issues.len(), 8);
        for id in ids {
            assert!(issues.iter().any(|i| i.id == id));
        }
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let (_temp, storage) = setup_storage();
        storage.init().unwrap();

        let issue = sample_issue("Atomic");
        storage.save_issue(&issue).unwrap();

        let leftovers: Vec<_> = fs::read_dir(storage.root.join(ISSUES_DIR))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
