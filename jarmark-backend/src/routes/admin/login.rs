use http::StatusCode;
use serde::Deserialize;

use crate::auth::{LOGIN_FAILED, LOGIN_SUCCEEDED};
use crate::components::admin::login_form;
use crate::components::main::csrf_input;
use crate::csrf_protection::{CsrfSafeForm, CsrfToken};
use crate::error::AppError;
use crate::routes::admin::LOGIN_PATH;
use crate::routes::{redirect, render_page, HttpResponse};
use crate::session::{FlashKind, Session};
use crate::AppState;

pub const PAGE_TITLE: &str = "Logowanie";

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct LoginPayload {
    csrf_token: String,
    username: String,
    password: String,
}

impl CsrfToken for LoginPayload {
    fn csrf_token(&self) -> &str {
        &self.csrf_token
    }
}

pub fn login_page(session: &mut Session) -> Result<HttpResponse, AppError> {
    let content = login_form(&csrf_input(session), "", None);
    render_page(session, false, StatusCode::OK, PAGE_TITLE, &content)
}

pub fn login(state: &AppState, session: &mut Session, body: &[u8]) -> Result<HttpResponse, AppError> {
    let payload = CsrfSafeForm::<LoginPayload>::from_body(body, session)?.value;
    if let Some(token) = state.auth.login(&payload.username, &payload.password) {
        if let Some(previous) = session.admin_session() {
            state.auth.logout(previous);
        }
        session.set_admin_session(token);
        session.set_flash(FlashKind::Success, LOGIN_SUCCEEDED);
        return redirect(session, LOGIN_PATH);
    }
    let content = login_form(&csrf_input(session), &payload.username, Some(LOGIN_FAILED));
    render_page(session, false, StatusCode::UNAUTHORIZED, PAGE_TITLE, &content)
}
