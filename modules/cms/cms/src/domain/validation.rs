//! Input checks shared by the registries.

use std::sync::LazyLock;

use regex::Regex;

use super::error::DomainError;

static SLUG_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").ok());

/// Maximum length accepted for names and slugs.
pub const MAX_NAME_LEN: usize = 255;

/// `true` when `slug` is lowercase alphanumerics and hyphens only.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_RE.as_ref().is_some_and(|re| re.is_match(slug))
}

pub fn validate_slug(field: &str, slug: &str) -> Result<(), DomainError> {
    if slug.is_empty() {
        return Err(DomainError::validation(field, "can't be blank"));
    }
    if slug.len() > MAX_NAME_LEN {
        return Err(DomainError::validation(
            field,
            format!("is too long (maximum is {MAX_NAME_LEN} characters)"),
        ));
    }
    if !is_valid_slug(slug) {
        return Err(DomainError::validation(
            field,
            "only allows lowercase letters, numbers, and hyphens",
        ));
    }
    Ok(())
}

pub fn validate_name(field: &str, name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation(field, "can't be blank"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(DomainError::validation(
            field,
            format!("is too long (maximum is {MAX_NAME_LEN} characters)"),
        ));
    }
    Ok(())
}
