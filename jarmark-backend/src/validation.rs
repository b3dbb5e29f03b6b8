//! Format checks for the free-text fields of the registration form.
//!
//! Every check is a pure function of its input. Whether a field is required at
//! all is decided in [`crate::form`] before these run.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email pattern"));

static POSTAL_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}-[0-9]{3}$").expect("invalid postal code pattern"));

#[must_use]
pub fn validate_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// A NIP is valid when exactly ten digits remain after dropping everything else.
#[must_use]
pub fn validate_nip(nip: &str) -> bool {
    nip.chars().filter(char::is_ascii_digit).count() == 10
}

#[must_use]
pub fn validate_phone(phone: &str) -> bool {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .count()
        >= 9
}

/// Polish postal code `XX-XXX`, ignoring any character that is neither a digit nor `-`.
#[must_use]
pub fn validate_postal_code(postal_code: &str) -> bool {
    let cleaned: String = postal_code
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();
    POSTAL_CODE.is_match(&cleaned)
}
