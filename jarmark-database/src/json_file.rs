use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{NewSubmission, SubmissionRecord};
use crate::{SubmissionRepository, STORAGE_KEY};

/// Submissions kept in memory and mirrored to `<data_dir>/formSubmissions.json`.
///
/// The whole file is rewritten on every change while the lock is held, so
/// there is never more than one writer.
pub struct JsonFileStore {
    path: PathBuf,
    submissions: Mutex<Vec<SubmissionRecord>>,
}

impl JsonFileStore {
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(format!("{STORAGE_KEY}.json"));
        let submissions = hydrate(&path);
        info!(
            "loaded {} submissions from {}",
            submissions.len(),
            path.display()
        );
        Ok(Self {
            path,
            submissions: Mutex::new(submissions),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, submissions: &[SubmissionRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_vec(submissions)?;
        let temporary = self.path.with_extension("json.tmp");
        fs::write(&temporary, json)?;
        fs::rename(&temporary, &self.path)?;
        Ok(())
    }
}

/// A missing or unreadable file counts as an empty collection.
fn hydrate(path: &Path) -> Vec<SubmissionRecord> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("no submissions stored yet at {}", path.display());
            return Vec::new();
        }
        Err(err) => {
            warn!("failed to read {}: {err}", path.display());
            return Vec::new();
        }
    };
    serde_json::from_str(&content).unwrap_or_else(|err| {
        warn!("ignoring unparseable {}: {err}", path.display());
        Vec::new()
    })
}

impl SubmissionRepository for JsonFileStore {
    fn append(&self, submission: NewSubmission) -> Result<SubmissionRecord, StoreError> {
        let mut submissions = self.submissions.lock().map_err(|_| StoreError::Poisoned)?;
        let record = SubmissionRecord::stamp_now(submission);
        submissions.push(record.clone());
        if let Err(err) = self.persist(&submissions) {
            error!("failed to store submission {}: {err}", record.id);
            submissions.pop();
            return Err(err);
        }
        Ok(record)
    }

    fn list_all(&self) -> Result<Vec<SubmissionRecord>, StoreError> {
        Ok(self
            .submissions
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .clone())
    }

    fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        let mut submissions = self.submissions.lock().map_err(|_| StoreError::Poisoned)?;
        let position = submissions
            .iter()
            .position(|record| record.id == id)
            .ok_or(StoreError::NotFound(id))?;
        let removed = submissions.remove(position);
        if let Err(err) = self.persist(&submissions) {
            error!("failed to delete submission {id}: {err}");
            submissions.insert(position, removed);
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::models::{fixtures, TIMESTAMP_FORMAT};

    #[test]
    fn append_then_list_returns_stamped_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();

        let submission = fixtures::submission();
        let stored = store.append(submission.clone()).unwrap();

        let all = store.list_all().unwrap();
        let last = all.last().unwrap();
        assert_eq!(last, &stored);
        assert_eq!(last.submission, submission);
        assert!(
            NaiveDateTime::parse_from_str(&last.submission_date_time, TIMESTAMP_FORMAT).is_ok()
        );
        assert_eq!(last.submission_date_time.len(), "2025-06-07 09:05:03".len());
    }

    #[test]
    fn reopening_hydrates_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let first = {
            let store = JsonFileStore::open(dir.path()).unwrap();
            store.append(fixtures::submission()).unwrap()
        };
        let store = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(store.path(), dir.path().join("formSubmissions.json"));
        assert_eq!(store.list_all().unwrap(), vec![first]);
    }

    #[test]
    fn unparseable_file_counts_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("formSubmissions.json"), "{ not json").unwrap();

        let store = JsonFileStore::open(dir.path()).unwrap();
        assert!(store.list_all().unwrap().is_empty());

        store.append(fixtures::submission()).unwrap();
        let reopened = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.list_all().unwrap().len(), 1);
    }

    #[test]
    fn concurrent_appends_are_persisted_in_timestamp_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..5 {
                        store.append(fixtures::submission()).unwrap();
                    }
                });
            }
        });

        let reopened = JsonFileStore::open(dir.path()).unwrap().list_all().unwrap();
        assert_eq!(reopened, store.list_all().unwrap());
        assert_eq!(reopened.len(), 20);
        assert!(reopened
            .windows(2)
            .all(|pair| pair[0].submission_date_time <= pair[1].submission_date_time));
    }

    #[test]
    fn delete_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let gone = store.append(fixtures::submission()).unwrap();
        let kept = store.append(fixtures::submission()).unwrap();

        store.delete_by_id(gone.id).unwrap();

        let reopened = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.list_all().unwrap(), vec![kept]);
        assert!(matches!(
            reopened.delete_by_id(gone.id),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn failed_write_leaves_collection_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let existing = store.append(fixtures::submission()).unwrap();

        // a non-empty directory where the file should go makes the rename fail
        fs::remove_file(store.path()).unwrap();
        fs::create_dir(store.path()).unwrap();
        fs::write(store.path().join("blocker"), "").unwrap();

        assert!(store.append(fixtures::submission()).is_err());
        assert_eq!(store.list_all().unwrap(), vec![existing.clone()]);

        assert!(store.delete_by_id(existing.id).is_err());
        assert_eq!(store.list_all().unwrap(), vec![existing]);
    }
}
