use tracing::{info, warn};
use uuid::Uuid;

use crate::csrf_protection::{CsrfOnly, CsrfSafeForm};
use crate::error::AppError;
use crate::routes::admin::LOGIN_PATH;
use crate::routes::{redirect, HttpResponse};
use crate::session::{FlashKind, Session};
use crate::AppState;

pub const DELETED: &str = "Zgłoszenie zostało usunięte.";
pub const DELETE_FAILED: &str = "Nie udało się usunąć zgłoszenia.";

pub fn delete(
    state: &AppState,
    session: &mut Session,
    id: &str,
    body: &[u8],
) -> Result<HttpResponse, AppError> {
    CsrfSafeForm::<CsrfOnly>::from_body(body, session)?;
    let result = Uuid::parse_str(id)
        .map_err(|_| AppError::NotFound)
        .and_then(|id| state.repository.delete_by_id(id).map_err(AppError::from));
    match result {
        Ok(()) => {
            info!("deleted submission {id}");
            session.set_flash(FlashKind::Success, DELETED);
        }
        Err(err) => {
            warn!("failed to delete submission {id}: {err}");
            session.set_flash(FlashKind::Error, DELETE_FAILED);
        }
    }
    redirect(session, LOGIN_PATH)
}
