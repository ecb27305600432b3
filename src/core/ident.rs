use super::{LedgerError, Result};
use regex::Regex;

pub const DEFAULT_MAX_ID_LEN: usize = 64;

/// Extra length allowed for ids derived from a caller id by appending `-V<n>`
/// (`n` a `u32`, at most 10 digits).
pub const DERIVED_ID_SUFFIX_LEN: usize = 12;

lazy_static::lazy_static! {
    static ref ID_PATTERN: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$")
        .expect("identifier pattern is valid");
}

/// Check a caller-supplied identifier with the default length limit.
pub fn validate_id(field: &str, value: &str) -> Result<()> {
    validate_id_with_limit(field, value, DEFAULT_MAX_ID_LEN)
}

/// Identifiers become ledger keys, so they are restricted to characters that sort
/// below the namespace range terminator.
pub fn validate_id_with_limit(field: &str, value: &str, max_len: usize) -> Result<()> {
    if value.is_empty() {
        return Err(LedgerError::InvalidArgument(format!("{} must not be empty", field)));
    }
    if value.len() > max_len {
        return Err(LedgerError::InvalidArgument(format!(
            "{} '{}' is longer than {} characters",
            field, value, max_len
        )));
    }
    if !ID_PATTERN.is_match(value) {
        return Err(LedgerError::InvalidArgument(format!(
            "{} '{}' contains characters outside [A-Za-z0-9._-]",
            field, value
        )));
    }
    Ok(())
}
