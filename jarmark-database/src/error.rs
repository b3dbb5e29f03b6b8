use thiserror::Error;
use uuid::Uuid;

#[allow(clippy::module_name_repetitions)]
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access the submission file {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode submissions {0}")]
    Json(#[from] serde_json::Error),
    #[error("Submission {0} does not exist")]
    NotFound(Uuid),
    #[error("Submission store lock poisoned")]
    Poisoned,
}
