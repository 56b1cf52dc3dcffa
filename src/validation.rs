//! Field rules shared by the registration endpoint and the client forms.

use lazy_static::lazy_static;
use regex::Regex;

pub const MIN_PASSWORD_LEN: usize = 6;

pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
pub const PASSWORDS_DONT_MATCH: &str = "Passwords don't match";

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn check_email(email: &str) -> Result<(), &'static str> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(INVALID_EMAIL)
    }
}

/// Length is counted in characters, not bytes.
pub fn check_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(PASSWORD_TOO_SHORT)
    }
}

/// Checks a registration payload, collecting every failing rule.
pub fn check_registration(email: &str, password: &str) -> Result<(), Vec<String>> {
    let errors: Vec<String> = [check_email(email), check_password(password)]
        .into_iter()
        .filter_map(Result::err)
        .map(String::from)
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
