use http::StatusCode;
use uuid::Uuid;

use crate::components::admin::detail as detail_page;
use crate::components::main::csrf_input;
use crate::error::AppError;
use crate::routes::{render_page, HttpResponse};
use crate::session::Session;
use crate::AppState;

pub fn detail(state: &AppState, session: &mut Session, id: &str) -> Result<HttpResponse, AppError> {
    let id = Uuid::parse_str(id).map_err(|_| AppError::NotFound)?;
    let record = state
        .repository
        .find_by_id(id)?
        .ok_or(AppError::NotFound)?;
    let content = detail_page(&record, &csrf_input(session));
    render_page(
        session,
        true,
        StatusCode::OK,
        &record.submission.company_name,
        &content,
    )
}
