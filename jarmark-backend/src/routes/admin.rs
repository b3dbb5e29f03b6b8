pub mod dashboard;
pub mod delete;
pub mod detail;
pub mod export;
pub mod login;
pub mod logout;
pub mod password;

use crate::error::AppError;
use crate::routes::{redirect, HttpResponse};
use crate::session::Session;
use crate::AppState;

pub const LOGIN_PATH: &str = "/admin";

/// Sends visitors without a valid admin session to the login page.
pub fn require_admin(state: &AppState, session: &Session) -> Result<(), HttpResponse> {
    if state.is_admin(session) {
        Ok(())
    } else {
        Err(redirect(session, LOGIN_PATH).unwrap_or_else(|err| err.build_error_template(session)))
    }
}

/// Runs `handler` for admins, redirects everybody else.
pub fn guarded(
    state: &AppState,
    session: &mut Session,
    handler: impl FnOnce(&AppState, &mut Session) -> Result<HttpResponse, AppError>,
) -> Result<HttpResponse, AppError> {
    match require_admin(state, session) {
        Ok(()) => handler(state, session),
        Err(response) => Ok(response),
    }
}
