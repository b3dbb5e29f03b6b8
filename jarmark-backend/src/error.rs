use bytes::Bytes;
use headers::ContentType;
use http::{Response, StatusCode};
use http_body_util::Full;
use jarmark_config::ConfigError;
use jarmark_database::error::StoreError;
use tracing::error;

use crate::auth::AuthError;
use crate::components::main::{escape, main};
use crate::session::{ResponseSessionExt as _, Session};
use crate::ResponseTypedHeaderExt as _;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("form error: {0}")]
    Form(#[from] serde_urlencoded::de::Error),
    #[error("request body error: {0}")]
    Body(Box<dyn std::error::Error + Send + Sync>),
    #[error("request body too large")]
    PayloadTooLarge,
    #[error("IO error: {0}")]
    File(#[from] std::io::Error),
    #[error("http error: {0}")]
    Http(#[from] http::Error),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),
    #[error("wrong csrf token")]
    WrongCsrfToken,
    #[error("Nie znaleziono strony")]
    NotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Json(_) | Self::Form(_) | Self::Body(_) | Self::WrongCsrfToken => {
                StatusCode::BAD_REQUEST
            }
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Store(_)
            | Self::File(_)
            | Self::Http(_)
            | Self::Config(_)
            | Self::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn build_error_template(self, session: &Session) -> Response<Full<Bytes>> {
        let status = self.status();
        if status.is_server_error() {
            error!("{self}");
        }
        let title = status.canonical_reason().unwrap_or("Error");
        let content = format!(
            r#"<h1 class="center">{}</h1><div class="error-message">{}</div><p><a href="/">Powrót do formularza</a></p>"#,
            status.as_u16(),
            escape(&self.to_string()),
        );
        let html = main(title, session, false, None, &content);
        Response::builder()
            .status(status)
            .with_session(session)
            .typed_header(ContentType::html())
            .body(Full::new(Bytes::from(html)))
            .unwrap_or_else(|err| plain_error(&err))
    }
}

/// Last resort when even the error page cannot be built.
pub fn plain_error(err: &http::Error) -> Response<Full<Bytes>> {
    error!("failed to build response: {err}");
    let mut response = Response::new(Full::new(Bytes::from_static(b"Internal Server Error")));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}
