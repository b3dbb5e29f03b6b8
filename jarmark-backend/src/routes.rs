pub mod admin;
pub mod assets;
pub mod index;
pub mod submit;
pub mod validate;

use bytes::Bytes;
use headers::ContentType;
use http::header::LOCATION;
use http::{Response, StatusCode};
use http_body_util::Full;

use crate::components::main::main;
use crate::error::AppError;
use crate::session::{ResponseSessionExt as _, Session};
use crate::ResponseTypedHeaderExt as _;

pub type HttpResponse = Response<Full<Bytes>>;

/// Wraps `content` in the page frame, consuming the pending notification.
pub fn render_page(
    session: &mut Session,
    is_admin: bool,
    status: StatusCode,
    page_title: &str,
    content: &str,
) -> Result<HttpResponse, AppError> {
    let flash = session.take_flash();
    let html = main(page_title, session, is_admin, flash.as_ref(), content);
    Ok(Response::builder()
        .status(status)
        .with_session(session)
        .typed_header(ContentType::html())
        .body(Full::new(Bytes::from(html)))?)
}

pub fn redirect(session: &Session, location: &str) -> Result<HttpResponse, AppError> {
    Ok(Response::builder()
        .status(StatusCode::SEE_OTHER)
        .with_session(session)
        .header(LOCATION, location)
        .body(Full::default())?)
}
