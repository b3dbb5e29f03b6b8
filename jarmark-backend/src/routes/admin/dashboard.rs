use http::StatusCode;

use crate::components::admin::dashboard as dashboard_page;
use crate::error::AppError;
use crate::listing::{build_listing, ListingQuery};
use crate::routes::admin::login::login_page;
use crate::routes::{render_page, HttpResponse};
use crate::session::Session;
use crate::AppState;

/// The submission table for admins, the login form for everybody else.
pub fn dashboard(
    state: &AppState,
    session: &mut Session,
    query: Option<&str>,
) -> Result<HttpResponse, AppError> {
    if !state.is_admin(session) {
        return login_page(session);
    }
    let query: ListingQuery = serde_urlencoded::from_str(query.unwrap_or_default())?;
    let listing = build_listing(state.repository.list_all()?, &query);
    let content = dashboard_page(&listing, &query);
    render_page(session, true, StatusCode::OK, "Panel administratora", &content)
}
