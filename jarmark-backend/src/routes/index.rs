use http::StatusCode;

use crate::components::form::registration_form;
use crate::components::main::csrf_input;
use crate::error::AppError;
use crate::form::{FormData, FormErrors};
use crate::routes::{render_page, HttpResponse};
use crate::session::Session;
use crate::AppState;

pub const PAGE_TITLE: &str = "Formularz zgłoszeniowy";

pub fn index(state: &AppState, session: &mut Session) -> Result<HttpResponse, AppError> {
    let content = registration_form(
        &FormData::default(),
        &FormErrors::default(),
        &csrf_input(session),
        None,
    );
    let is_admin = state.is_admin(session);
    render_page(session, is_admin, StatusCode::OK, PAGE_TITLE, &content)
}
