use http::StatusCode;
use serde::Deserialize;
use tracing::{error, info};

use crate::components::form::registration_form;
use crate::components::main::csrf_input;
use crate::components::submission::confirmation;
use crate::csrf_protection::{CsrfSafeForm, CsrfToken};
use crate::error::AppError;
use crate::form::{FormData, FormErrors, FormState, FORM_HAS_ERRORS};
use crate::routes::index::PAGE_TITLE;
use crate::routes::{render_page, HttpResponse};
use crate::session::Session;
use crate::AppState;

pub const STORE_FAILED: &str = "Nie udało się zapisać zgłoszenia. Spróbuj ponownie później.";

#[derive(Deserialize)]
pub struct SubmitPayload {
    #[serde(default)]
    csrf_token: String,
    #[serde(flatten)]
    form: FormData,
}

impl CsrfToken for SubmitPayload {
    fn csrf_token(&self) -> &str {
        &self.csrf_token
    }
}

pub fn submit(state: &AppState, session: &mut Session, body: &[u8]) -> Result<HttpResponse, AppError> {
    let payload = CsrfSafeForm::<SubmitPayload>::from_body(body, session)?.value;
    let is_admin = state.is_admin(session);
    let form = payload.form;

    let (status, notice, errors) = match FormState::default().submit(&form) {
        Err(errors) => (StatusCode::UNPROCESSABLE_ENTITY, FORM_HAS_ERRORS, errors),
        Ok(submission) => match state.repository.append(submission) {
            Ok(record) => {
                info!("stored submission {}", record.id);
                return render_page(
                    session,
                    is_admin,
                    StatusCode::OK,
                    "Zgłoszenie przyjęte",
                    &confirmation(&record),
                );
            }
            Err(err) => {
                error!("failed to store submission: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, STORE_FAILED, FormErrors::default())
            }
        },
    };
    let content = registration_form(&form, &errors, &csrf_input(session), Some(notice));
    render_page(session, is_admin, status, PAGE_TITLE, &content)
}
