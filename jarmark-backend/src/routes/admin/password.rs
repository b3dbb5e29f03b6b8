use http::StatusCode;

use crate::auth::{
    validate_password_change, AuthError, PasswordChange, PasswordErrors, PASSWORD_CHANGED,
    WRONG_CURRENT_PASSWORD,
};
use crate::components::admin::password_form;
use crate::components::main::csrf_input;
use crate::csrf_protection::CsrfSafeForm;
use crate::error::AppError;
use crate::routes::admin::LOGIN_PATH;
use crate::routes::{redirect, render_page, HttpResponse};
use crate::session::{FlashKind, Session};
use crate::AppState;

const PAGE_TITLE: &str = "Zmiana hasła";

fn render(
    session: &mut Session,
    status: StatusCode,
    errors: &PasswordErrors,
) -> Result<HttpResponse, AppError> {
    let content = password_form(&csrf_input(session), errors);
    render_page(session, true, status, PAGE_TITLE, &content)
}

pub fn password_page(session: &mut Session) -> Result<HttpResponse, AppError> {
    render(session, StatusCode::OK, &PasswordErrors::default())
}

pub fn change_password(
    state: &AppState,
    session: &mut Session,
    body: &[u8],
) -> Result<HttpResponse, AppError> {
    let change = CsrfSafeForm::<PasswordChange>::from_body(body, session)?.value;
    if let Err(errors) = validate_password_change(&change) {
        return render(session, StatusCode::UNPROCESSABLE_ENTITY, &errors);
    }
    match state
        .auth
        .change_password(&change.current_password, &change.new_password)
    {
        Ok(()) => {
            session.set_flash(FlashKind::Success, PASSWORD_CHANGED);
            redirect(session, LOGIN_PATH)
        }
        Err(AuthError::WrongCurrentPassword) => render(
            session,
            StatusCode::UNPROCESSABLE_ENTITY,
            &PasswordErrors {
                current_password: Some(WRONG_CURRENT_PASSWORD),
                ..PasswordErrors::default()
            },
        ),
        Err(err) => Err(err.into()),
    }
}
