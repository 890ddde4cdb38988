//! Input validation helpers. Field checks mirror the wire contract:
//! a well-formed email, and minimum lengths of 5 for passwords, post
//! titles and post content.

use domains::error::FieldError;

/// Minimum length shared by passwords, titles and content.
pub const MIN_LEN: usize = 5;

/// Just enough of an email check to reject obvious garbage: exactly one
/// `@`, a non-empty local part, and a domain containing a dot. Real
/// verification happens by mailing the address, not by parsing it.
pub fn is_email(value: &str) -> bool {
    let mut parts = value.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !value.chars().any(char::is_whitespace)
}

pub fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if !is_email(email) {
        errors.push(FieldError::new("email", "Invalid email address"));
    }
}

pub fn check_password(password: &str, errors: &mut Vec<FieldError>) {
    if password.trim().is_empty() || password.len() < MIN_LEN {
        errors.push(FieldError::new("password", "Invalid password"));
    }
}

pub fn check_name(name: &str, errors: &mut Vec<FieldError>) {
    if name.trim().is_empty() {
        errors.push(FieldError::new("name", "Name required"));
    }
}

pub fn check_title(title: &str, errors: &mut Vec<FieldError>) {
    if title.trim().is_empty() || title.len() < MIN_LEN {
        errors.push(FieldError::new("title", "Title invalid"));
    }
}

pub fn check_content(content: &str, errors: &mut Vec<FieldError>) {
    if content.trim().is_empty() || content.len() < MIN_LEN {
        errors.push(FieldError::new("content", "Content invalid"));
    }
}
