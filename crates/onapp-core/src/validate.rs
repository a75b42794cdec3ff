//! Argument checks performed before a request is built.

use crate::error::{Error, Result};

/// Reject identifiers below 1.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] when `id < 1`.
pub fn ensure_id(argument: &str, id: i64) -> Result<()> {
    if id < 1 {
        return Err(Error::invalid_argument(argument, "cannot be less than 1"));
    }
    Ok(())
}

/// Reject payloads equal to their default (every field unset).
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for an empty payload.
pub fn ensure_payload<T>(argument: &str, payload: &T) -> Result<()>
where
    T: Default + PartialEq,
{
    if *payload == T::default() {
        return Err(Error::invalid_argument(argument, "cannot be empty"));
    }
    Ok(())
}

/// Reject empty or whitespace-only strings.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for a blank value.
pub fn ensure_not_blank(argument: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(()),
        _ => Err(Error::invalid_argument(argument, "cannot be blank")),
    }
}

/// Reject values that cannot be used verbatim as one URL path segment.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the value contains `/`, `?`, `#`,
/// `%`, whitespace or control characters, or is `.` / `..`.
pub fn ensure_path_segment(argument: &str, value: &str) -> Result<()> {
    let reserved =
        |c: char| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace() || c.is_control();
    if value.chars().any(reserved) || value == "." || value == ".." {
        return Err(Error::invalid_argument(argument, "must be a single URL path segment"));
    }
    Ok(())
}
