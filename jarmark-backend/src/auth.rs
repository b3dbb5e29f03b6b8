//! The admin gate: a single configured account behind the [`AuthProvider`]
//! seam, so a real identity provider can replace it without touching routes.

use std::collections::HashSet;
use std::sync::{Mutex, RwLock};

use jarmark_config::AdminConfig;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng as _};
use sha2::{Digest as _, Sha256};
use tracing::{info, warn};

const TOKEN_LENGTH: usize = 32;
const MIN_PASSWORD_LENGTH: usize = 8;
const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

pub const LOGIN_SUCCEEDED: &str = "Zalogowano pomyślnie!";
pub const LOGIN_FAILED: &str = "Niepoprawne dane logowania";
pub const LOGGED_OUT: &str = "Wylogowano pomyślnie";
pub const PASSWORD_CHANGED: &str = "Hasło zostało zmienione pomyślnie";

pub const CURRENT_PASSWORD_REQUIRED: &str = "Aktualne hasło jest wymagane";
pub const PASSWORD_TOO_SHORT: &str = "Hasło musi mieć minimum 8 znaków";
pub const PASSWORD_NEEDS_UPPERCASE: &str = "Hasło musi zawierać przynajmniej jedną wielką literę";
pub const PASSWORD_NEEDS_DIGIT: &str = "Hasło musi zawierać przynajmniej jedną cyfrę";
pub const PASSWORD_NEEDS_SPECIAL: &str = "Hasło musi zawierać przynajmniej jeden znak specjalny";
pub const CONFIRMATION_REQUIRED: &str = "Potwierdzenie hasła jest wymagane";
pub const PASSWORDS_DIFFER: &str = "Hasła nie są identyczne";
pub const WRONG_CURRENT_PASSWORD: &str = "Aktualne hasło jest nieprawidłowe";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Aktualne hasło jest nieprawidłowe")]
    WrongCurrentPassword,
    #[error("credential lock poisoned")]
    Poisoned,
}

pub trait AuthProvider: Send + Sync {
    /// Returns a fresh session token when the credentials match.
    fn login(&self, username: &str, password: &str) -> Option<String>;

    fn is_authenticated(&self, token: &str) -> bool;

    fn logout(&self, token: &str);

    fn change_password(&self, current: &str, new: &str) -> Result<(), AuthError>;
}

fn digest(password: &str) -> [u8; 32] {
    Sha256::digest(password.as_bytes()).into()
}

fn generate_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// One username/password pair from the configuration. Sessions and a changed
/// password live only as long as the process.
pub struct StaticCredentials {
    username: String,
    password_digest: RwLock<[u8; 32]>,
    sessions: Mutex<HashSet<String>>,
}

impl StaticCredentials {
    #[must_use]
    pub fn new(config: &AdminConfig) -> Self {
        Self {
            username: config.username.clone(),
            password_digest: RwLock::new(digest(&config.password)),
            sessions: Mutex::new(HashSet::new()),
        }
    }

    fn password_matches(&self, password: &str) -> Result<bool, AuthError> {
        let stored = self
            .password_digest
            .read()
            .map_err(|_| AuthError::Poisoned)?;
        Ok(*stored == digest(password))
    }
}

impl AuthProvider for StaticCredentials {
    fn login(&self, username: &str, password: &str) -> Option<String> {
        if username != self.username || !self.password_matches(password).ok()? {
            warn!("failed admin login for {username:?}");
            return None;
        }
        let token = generate_token();
        self.sessions.lock().ok()?.insert(token.clone());
        info!("admin logged in");
        Some(token)
    }

    fn is_authenticated(&self, token: &str) -> bool {
        self.sessions
            .lock()
            .is_ok_and(|sessions| sessions.contains(token))
    }

    fn logout(&self, token: &str) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.remove(token);
        }
    }

    fn change_password(&self, current: &str, new: &str) -> Result<(), AuthError> {
        if !self.password_matches(current)? {
            return Err(AuthError::WrongCurrentPassword);
        }
        *self
            .password_digest
            .write()
            .map_err(|_| AuthError::Poisoned)? = digest(new);
        info!("admin password changed");
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordChange {
    #[serde(rename = "csrf_token")]
    pub csrf_token: String,
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Messages for the three inputs of the password form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PasswordErrors {
    pub current_password: Option<&'static str>,
    pub new_password: Option<&'static str>,
    pub confirm_password: Option<&'static str>,
}

impl PasswordErrors {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.current_password.is_none()
            && self.new_password.is_none()
            && self.confirm_password.is_none()
    }
}

fn check_new_password(password: &str) -> Option<&'static str> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        Some(PASSWORD_TOO_SHORT)
    } else if !password.chars().any(|c| c.is_ascii_uppercase()) {
        Some(PASSWORD_NEEDS_UPPERCASE)
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some(PASSWORD_NEEDS_DIGIT)
    } else if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        Some(PASSWORD_NEEDS_SPECIAL)
    } else {
        None
    }
}

/// Checks the form before the current password is verified. The mismatch
/// message only appears once every other rule passes.
pub fn validate_password_change(change: &PasswordChange) -> Result<(), PasswordErrors> {
    let mut errors = PasswordErrors {
        current_password: change
            .current_password
            .is_empty()
            .then_some(CURRENT_PASSWORD_REQUIRED),
        new_password: check_new_password(&change.new_password),
        confirm_password: change
            .confirm_password
            .is_empty()
            .then_some(CONFIRMATION_REQUIRED),
    };
    if errors.is_empty() && change.new_password != change.confirm_password {
        errors.confirm_password = Some(PASSWORDS_DIFFER);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
