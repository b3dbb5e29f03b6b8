use crate::auth::LOGGED_OUT;
use crate::csrf_protection::{CsrfOnly, CsrfSafeForm};
use crate::error::AppError;
use crate::routes::{redirect, HttpResponse};
use crate::session::{FlashKind, Session};
use crate::AppState;

pub fn logout(state: &AppState, session: &mut Session, body: &[u8]) -> Result<HttpResponse, AppError> {
    CsrfSafeForm::<CsrfOnly>::from_body(body, session)?;
    if let Some(token) = session.admin_session() {
        state.auth.logout(token);
    }
    session.clear_admin_session();
    session.set_flash(FlashKind::Success, LOGGED_OUT);
    redirect(session, "/")
}
