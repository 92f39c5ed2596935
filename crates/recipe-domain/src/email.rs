//! Email address normalization and validation.

/// Errors returned by [`normalize_email`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailError {
    #[error("email is required")]
    Empty,
}

/// Normalize an email address: trim it, then lowercase the domain part only.
///
/// The split happens on the last `@`, so quoted local parts containing `@` keep
/// their case. Input without `@` is returned trimmed but otherwise unchanged;
/// use [`is_valid_email`] to reject it.
///
/// ```
/// use recipe_domain::email::normalize_email;
///
/// assert_eq!(normalize_email("Test2@Example.com").unwrap(), "Test2@example.com");
/// assert!(normalize_email("").is_err());
/// ```
pub fn normalize_email(raw: &str) -> Result<String, EmailError> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(EmailError::Empty);
    }
    match email.rsplit_once('@') {
        Some((local, domain)) => Ok(format!("{local}@{}", domain.to_lowercase())),
        None => Ok(email.to_owned()),
    }
}

/// Minimal shape check: `local@domain` with both parts non-empty and no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.rsplit_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    }
}
