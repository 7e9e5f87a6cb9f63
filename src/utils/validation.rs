//! Input validation utilities

use std::sync::LazyLock;

use regex::Regex;

/// Phone numbers: optional leading `+`, then digits, spaces, dashes and parentheses
pub static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9 ()\-]{3,19}$").expect("valid phone regex"));

/// Usernames: letters, digits, underscores, dots and hyphens
pub static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("valid username regex"));

/// Sanitize string input (remove control characters, trim whitespace)
pub fn sanitize_string(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}
