use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash as _, Hasher as _};
use std::time::Duration;

use bytes::Bytes;
use headers::{CacheControl, ContentType, ETag, HeaderMapExt as _, IfNoneMatch};
use http::{HeaderMap, Response, StatusCode};
use http_body_util::Full;
use once_cell::sync::Lazy;

use crate::error::AppError;
use crate::ResponseTypedHeaderExt as _;

pub static INDEX_CSS: &str = include_str!("../../frontend/index.css");
pub static FORM_JS: &str = include_str!("../../frontend/form.js");

/// Appended to asset links so a new build is fetched despite the long cache lifetime.
pub static ASSETS_VERSION: Lazy<u64> = Lazy::new(|| {
    let mut hasher = DefaultHasher::new();
    INDEX_CSS.hash(&mut hasher);
    FORM_JS.hash(&mut hasher);
    hasher.finish()
});

static ASSETS_ETAG: Lazy<Option<ETag>> =
    Lazy::new(|| format!("\"{:x}\"", *ASSETS_VERSION).parse().ok());

fn serve(
    headers: &HeaderMap,
    content: &'static str,
    content_type: ContentType,
) -> Result<Response<Full<Bytes>>, AppError> {
    let etag = ASSETS_ETAG.as_ref();
    let if_none_match: Option<IfNoneMatch> = headers.typed_get();
    if let (Some(etag), Some(if_none_match)) = (etag, if_none_match) {
        if !if_none_match.precondition_passes(etag) {
            return Ok(Response::builder()
                .status(StatusCode::NOT_MODIFIED)
                .body(Full::default())?);
        }
    }
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .typed_header(content_type)
        .typed_header(
            CacheControl::new()
                .with_immutable()
                .with_public()
                .with_max_age(Duration::from_secs(31_536_000)),
        );
    if let Some(etag) = etag {
        builder = builder.typed_header(etag.clone());
    }
    Ok(builder.body(Full::new(Bytes::from_static(content.as_bytes())))?)
}

pub fn indexcss(headers: &HeaderMap) -> Result<Response<Full<Bytes>>, AppError> {
    serve(headers, INDEX_CSS, ContentType::from(mime::TEXT_CSS_UTF_8))
}

pub fn formjs(headers: &HeaderMap) -> Result<Response<Full<Bytes>>, AppError> {
    serve(
        headers,
        FORM_JS,
        ContentType::from(mime::APPLICATION_JAVASCRIPT_UTF_8),
    )
}

#[cfg(test)]
mod tests {
    use http::header::{ETAG, IF_NONE_MATCH};

    use super::*;

    #[test]
    fn matching_etag_is_not_modified() {
        let response = indexcss(&HeaderMap::new()).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let etag = response.headers().get(ETAG).unwrap().clone();

        let mut headers = HeaderMap::new();
        headers.insert(IF_NONE_MATCH, etag);
        let response = indexcss(&headers).unwrap();
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    }
}
