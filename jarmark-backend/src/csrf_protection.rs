use serde::de::DeserializeOwned;

use crate::auth::PasswordChange;
use crate::error::AppError;
use crate::session::Session;

pub trait CsrfToken {
    fn csrf_token(&self) -> &str;
}

/// A url-encoded form body whose `csrf_token` matched the session cookie.
#[derive(Debug)]
pub struct CsrfSafeForm<T: CsrfToken> {
    pub value: T,
}

impl<T: DeserializeOwned + CsrfToken> CsrfSafeForm<T> {
    pub fn from_body(body: &[u8], session: &Session) -> Result<Self, AppError> {
        let value: T = serde_urlencoded::from_bytes(body)?;
        if value.csrf_token() != session.csrf_token() {
            return Err(AppError::WrongCsrfToken);
        }
        Ok(Self { value })
    }
}

/// Forms that carry nothing but the token.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

impl CsrfToken for CsrfOnly {
    fn csrf_token(&self) -> &str {
        &self.csrf_token
    }
}

impl CsrfToken for PasswordChange {
    fn csrf_token(&self) -> &str {
        &self.csrf_token
    }
}
