use cookie::{Cookie, SameSite};
use http::header::{COOKIE, SET_COOKIE};
use http::HeaderMap;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng as _};
use serde::{Deserialize, Serialize};
use tracing::debug;

const COOKIE_NAME_CSRF_TOKEN: &str = "__Host_csrf_token";
const COOKIE_NAME_ADMIN_SESSION: &str = "__Host_admin_session";
const COOKIE_NAME_FLASH: &str = "__Host_flash";

const CSRF_TOKEN_LENGTH: usize = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "notification success",
            Self::Error => "notification error",
        }
    }
}

/// A notification that survives exactly one redirect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

/// Cookie state of one request. Every value carries a flag that is true when
/// it changed and has to be sent back.
#[derive(Clone, Debug)]
#[must_use]
pub struct Session {
    csrf_token: (String, bool),
    admin_session: (Option<String>, bool),
    flash: (Option<Flash>, bool),
}

impl Session {
    pub fn new(headers: &HeaderMap) -> Self {
        let mut csrf_token = None;
        let mut admin_session = None;
        let mut flash = None;
        headers
            .get_all(COOKIE)
            .into_iter()
            .filter_map(|value| value.to_str().ok())
            .map(ToOwned::to_owned)
            .flat_map(Cookie::split_parse_encoded)
            .filter_map(Result::ok)
            .for_each(|cookie| match cookie.name() {
                COOKIE_NAME_CSRF_TOKEN if !cookie.value().is_empty() => {
                    csrf_token = Some(cookie.value().to_owned());
                }
                COOKIE_NAME_ADMIN_SESSION if !cookie.value().is_empty() => {
                    admin_session = Some(cookie.value().to_owned());
                }
                COOKIE_NAME_FLASH => match serde_json::from_str::<Flash>(cookie.value()) {
                    Ok(value) => flash = Some(value),
                    Err(err) => debug!("ignoring malformed flash cookie: {err}"),
                },
                _ => {
                    // ignore the cookies that are not interesting for us
                }
            });
        let csrf_token = csrf_token.map_or_else(
            || {
                (
                    thread_rng()
                        .sample_iter(&Alphanumeric)
                        .take(CSRF_TOKEN_LENGTH)
                        .map(char::from)
                        .collect(),
                    true,
                )
            },
            |token| (token, false),
        );
        Self {
            csrf_token,
            admin_session: (admin_session, false),
            flash: (flash, false),
        }
    }

    #[must_use]
    pub fn csrf_token(&self) -> &str {
        &self.csrf_token.0
    }

    #[must_use]
    pub fn admin_session(&self) -> Option<&str> {
        self.admin_session.0.as_deref()
    }

    pub fn set_admin_session(&mut self, token: String) {
        self.admin_session = (Some(token), true);
    }

    pub fn clear_admin_session(&mut self) {
        self.admin_session = (None, true);
    }

    /// Reads the pending notification and removes it from the browser.
    pub fn take_flash(&mut self) -> Option<Flash> {
        let flash = self.flash.0.take();
        if flash.is_some() {
            self.flash.1 = true;
        }
        flash
    }

    pub fn set_flash(&mut self, kind: FlashKind, message: impl Into<String>) {
        self.flash = (
            Some(Flash {
                kind,
                message: message.into(),
            }),
            true,
        );
    }
}

fn session_cookie(name: &'static str, value: Option<String>) -> Cookie<'static> {
    let mut cookie = Cookie::build((name, value.clone().unwrap_or_default()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    if value.is_none() {
        cookie.make_removal();
    }
    cookie
}

pub trait ResponseSessionExt {
    #[must_use]
    fn with_session(self, session: &Session) -> Self;
}

impl ResponseSessionExt for http::response::Builder {
    fn with_session(self, session: &Session) -> Self {
        let mut cookies = Vec::new();
        if let (value, true) = &session.csrf_token {
            cookies.push(session_cookie(COOKIE_NAME_CSRF_TOKEN, Some(value.clone())));
        }
        if let (value, true) = &session.admin_session {
            cookies.push(session_cookie(COOKIE_NAME_ADMIN_SESSION, value.clone()));
        }
        if let (value, true) = &session.flash {
            let value = value
                .as_ref()
                .and_then(|flash| serde_json::to_string(flash).ok());
            cookies.push(session_cookie(COOKIE_NAME_FLASH, value));
        }
        cookies.into_iter().fold(self, |this, cookie| {
            this.header(SET_COOKIE, cookie.encoded().to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use http::{HeaderValue, Response};

    use super::*;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    fn set_cookies(session: &Session) -> Vec<String> {
        let response = Response::builder().with_session(session).body(()).unwrap();
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|value| value.to_str().unwrap().to_owned())
            .collect()
    }

    #[test]
    fn fresh_session_issues_csrf_token() {
        let session = Session::new(&HeaderMap::new());
        assert_eq!(session.csrf_token().len(), CSRF_TOKEN_LENGTH);
        assert_eq!(session.admin_session(), None);

        let cookies = set_cookies(&session);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].starts_with(&format!("__Host_csrf_token={}", session.csrf_token())));
        assert!(cookies[0].contains("HttpOnly"));
    }

    #[test]
    fn known_cookies_are_read_back_untouched() {
        let session = Session::new(&headers(
            "other=1; __Host_csrf_token=abc; __Host_admin_session=xyz",
        ));
        assert_eq!(session.csrf_token(), "abc");
        assert_eq!(session.admin_session(), Some("xyz"));
        assert!(set_cookies(&session).is_empty());
    }

    #[test]
    fn flash_survives_one_round_trip() {
        let mut session = Session::new(&headers("__Host_csrf_token=abc"));
        session.set_flash(FlashKind::Success, "Zgłoszenie zostało usunięte.");
        let cookies = set_cookies(&session);
        assert_eq!(cookies.len(), 1);
        let pair = cookies[0].split(';').next().unwrap();

        let mut next = Session::new(&headers(&format!("__Host_csrf_token=abc; {pair}")));
        assert_eq!(
            next.take_flash(),
            Some(Flash {
                kind: FlashKind::Success,
                message: "Zgłoszenie zostało usunięte.".to_owned(),
            })
        );
        assert_eq!(next.take_flash(), None);
        let removal = set_cookies(&next);
        assert_eq!(removal.len(), 1);
        assert!(removal[0].starts_with("__Host_flash=;"));
        assert!(removal[0].contains("Max-Age=0"));
    }

    #[test]
    fn logout_removes_admin_cookie() {
        let mut session = Session::new(&headers("__Host_csrf_token=abc; __Host_admin_session=xyz"));
        session.clear_admin_session();
        assert_eq!(session.admin_session(), None);
        let cookies = set_cookies(&session);
        assert!(cookies[0].starts_with("__Host_admin_session=;"));
    }

    #[test]
    fn malformed_flash_is_ignored() {
        let mut session = Session::new(&headers("__Host_csrf_token=abc; __Host_flash=nope"));
        assert_eq!(session.take_flash(), None);
    }
}
