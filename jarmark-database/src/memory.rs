use std::sync::Mutex;

use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{NewSubmission, SubmissionRecord};
use crate::SubmissionRepository;

/// Keeps submissions for the lifetime of the process only.
#[derive(Default)]
pub struct MemoryStore {
    submissions: Mutex<Vec<SubmissionRecord>>,
}

impl SubmissionRepository for MemoryStore {
    fn append(&self, submission: NewSubmission) -> Result<SubmissionRecord, StoreError> {
        let mut submissions = self.submissions.lock().map_err(|_| StoreError::Poisoned)?;
        let record = SubmissionRecord::stamp_now(submission);
        submissions.push(record.clone());
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
        submissions.remove(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;

    #[test]
    fn keeps_insertion_order() {
        let store = MemoryStore::default();
        let mut first = fixtures::submission();
        first.company_name = "Pierwsza".to_owned();
        let mut second = fixtures::submission();
        second.company_name = "Druga".to_owned();
        store.append(first).unwrap();
        store.append(second).unwrap();

        let names: Vec<String> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|record| record.submission.company_name)
            .collect();
        assert_eq!(names, ["Pierwsza", "Druga"]);
    }

    #[test]
    fn concurrent_appends_are_stored_in_timestamp_order() {
        let store = MemoryStore::default();
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..25 {
                        store.append(fixtures::submission()).unwrap();
                    }
                });
            }
        });

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 200);
        assert!(all
            .windows(2)
            .all(|pair| pair[0].submission_date_time <= pair[1].submission_date_time));
    }

    #[test]
    fn delete_removes_only_the_matching_record() {
        let store = MemoryStore::default();
        let kept = store.append(fixtures::submission()).unwrap();
        let removed = store.append(fixtures::submission()).unwrap();

        store.delete_by_id(removed.id).unwrap();
        assert_eq!(store.list_all().unwrap(), vec![kept.clone()]);
        assert_eq!(store.find_by_id(kept.id).unwrap(), Some(kept));
        assert!(matches!(
            store.delete_by_id(removed.id),
            Err(StoreError::NotFound(id)) if id == removed.id
        ));
    }
}
