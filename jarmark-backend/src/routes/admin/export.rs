use bytes::Bytes;
use chrono::Local;
use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use http::{Response, StatusCode};
use http_body_util::Full;
use serde::Deserialize;
use tracing::info;

use crate::error::AppError;
use crate::export::{export as export_file, ExportFormat};
use crate::listing::filter;
use crate::routes::HttpResponse;
use crate::session::{ResponseSessionExt as _, Session};
use crate::AppState;

#[derive(Default, Deserialize)]
#[serde(default)]
struct ExportQuery {
    q: String,
}

/// Downloads the submissions matching `q` in insertion order.
pub fn export(
    state: &AppState,
    session: &mut Session,
    format: &str,
    query: Option<&str>,
) -> Result<HttpResponse, AppError> {
    let format: ExportFormat = format.parse().map_err(|_| AppError::NotFound)?;
    let query: ExportQuery = serde_urlencoded::from_str(query.unwrap_or_default())?;
    let records = filter(state.repository.list_all()?, &query.q);
    let file = export_file(format, &records, Local::now().date_naive());
    info!("exporting {} submissions as {}", records.len(), file.filename);
    Ok(Response::builder()
        .status(StatusCode::OK)
        .with_session(session)
        .header(CONTENT_TYPE, file.content_type)
        .header(
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.filename),
        )
        .body(Full::new(Bytes::from(file.bytes)))?)
}
