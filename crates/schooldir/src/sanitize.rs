//! Helpers for sanitizing data before it reaches disk or tracing spans.
//!
//! Logs are safe to share for debugging. These functions ensure no contact
//! details or full filesystem paths leak into span fields, and that an
//! uploaded filename cannot escape the image directory.

use std::path::Path;

/// Returns only the filename component of a path (no directory).
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

/// Masks the local part of an email address, keeping its first character.
///
/// - `admissions@greenwood.edu` → `a****@greenwood.edu`
/// - `not-an-email` → `****`
pub fn redact_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first = local.chars().next().unwrap_or('*');
            format!("{}****@{}", first, domain)
        }
        _ => "****".to_string(),
    }
}

/// Keeps only the last four digits of a phone number.
pub fn redact_phone(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    let tail: String = digits[digits.len().saturating_sub(4)..].iter().collect();
    format!("****{}", tail)
}

/// Reduces an uploaded filename to a safe single path component.
///
/// Directory parts are dropped, characters outside `[A-Za-z0-9._-]` become
/// `_`, and leading dots are removed so the result is never hidden or `..`.
pub fn safe_file_name(original: &str) -> String {
    let last = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original);

    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "image".to_string()
    } else {
        trimmed.to_string()
    }
}
