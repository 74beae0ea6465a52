use std::time::Duration;

use crate::error::ConfigError;

use super::duration::parse_text;

/// Read `key` and convert it with `parse`. Unset or blank variables yield `None`.
pub(super) fn lookup<T>(
    key: &'static str,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Result<Option<T>, ConfigError> {
    let value = match std::env::var(key) {
        Ok(value) => value,
        Err(std::env::VarError::NotPresent) => return Ok(None),
        Err(err) => return Err(ConfigError::Other(format!("{key}: {err}"))),
    };
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    parse(value)
        .map(Some)
        .map_err(|message| ConfigError::InvalidField {
            field: key,
            message,
        })
}

/// 1/true/yes/on and 0/false/no/off, case-insensitive.
pub(super) fn flag(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        other => Err(format!("expected a boolean, got {other:?}")),
    }
}

pub(super) fn duration(raw: &str) -> Result<Duration, String> {
    parse_text(raw)
}

pub(super) fn text(raw: &str) -> Result<String, String> {
    Ok(raw.to_string())
}
