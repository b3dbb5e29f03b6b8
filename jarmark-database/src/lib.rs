pub mod error;
pub mod json_file;
pub mod memory;
pub mod models;
pub mod schema;

use std::path::Path;
use std::sync::Arc;

use error::StoreError;
use uuid::Uuid;

use crate::json_file::JsonFileStore;
use crate::memory::MemoryStore;
use crate::models::{NewSubmission, SubmissionRecord};

/// Key under which the submission collection is persisted.
pub const STORAGE_KEY: &str = "formSubmissions";

/// Ordered, append-only collection of registrations.
///
/// Records come back in insertion order. The only way to remove one is
/// [`SubmissionRepository::delete_by_id`].
pub trait SubmissionRepository: Send + Sync {
    /// Stamps the submission with an id and the current local time, stores it
    /// and returns the stored record.
    fn append(&self, submission: NewSubmission) -> Result<SubmissionRecord, StoreError>;

    fn list_all(&self) -> Result<Vec<SubmissionRecord>, StoreError>;

    fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError>;

    fn find_by_id(&self, id: Uuid) -> Result<Option<SubmissionRecord>, StoreError> {
        Ok(self
            .list_all()?
            .into_iter()
            .find(|record| record.id == id))
    }
}

pub type Repository = Arc<dyn SubmissionRepository>;

pub fn open_json_repository(data_dir: &Path) -> Result<Repository, StoreError> {
    Ok(Arc::new(JsonFileStore::open(data_dir)?))
}

#[must_use]
pub fn memory_repository() -> Repository {
    Arc::new(MemoryStore::default())
}
