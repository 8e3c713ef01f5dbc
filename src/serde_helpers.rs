//! Serde helpers for decoding API payloads.
//!
//! When the `tracing` feature is enabled, unknown fields in REST responses are logged
//! so that server-side API drift shows up in the logs instead of being silently dropped.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Deserialize a JSON value, logging unknown fields when `tracing` is enabled.
///
/// Unknown fields never cause a failure. When deserialization does fail, the JSON path of
/// the offending value is logged before the error is returned.
#[cfg(feature = "tracing")]
pub fn deserialize_with_warnings<T: DeserializeOwned>(value: Value) -> crate::Result<T> {
    use std::any::type_name;

    tracing::trace!(
        type_name = %type_name::<T>(),
        json = %value,
        "deserializing JSON"
    );

    let original = value.clone();
    let mut unknown_paths: Vec<String> = Vec::new();

    let result: T = serde_ignored::deserialize(value, |path| {
        unknown_paths.push(path.to_string());
    })
    .inspect_err(|_| {
        let path_result: Result<T, _> = serde_path_to_error::deserialize(original.clone());
        if let Err(path_err) = path_result {
            tracing::error!(
                type_name = %type_name::<T>(),
                path = %path_err.path(),
                error = %path_err.inner(),
                "deserialization failed"
            );
        }
    })?;

    for path in unknown_paths {
        tracing::warn!(
            type_name = %type_name::<T>(),
            field = %path,
            "unknown field in API response"
        );
    }

    Ok(result)
}

/// Pass-through deserialization when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub fn deserialize_with_warnings<T: DeserializeOwned>(value: Value) -> crate::Result<T> {
    Ok(serde_json::from_value(value)?)
}

/// Convert a Misskey `camelCase` event tag into the canonical `SCREAMING_SNAKE_CASE` form.
///
/// Tags already in snake or screaming-snake case pass through unchanged apart from
/// upper-casing, so `messagingMessage`, `messaging_message` and `MESSAGING_MESSAGE` all
/// normalize to `MESSAGING_MESSAGE`.
#[must_use]
pub fn normalize_tag(tag: &str) -> String {
    let mut normalized = String::with_capacity(tag.len() + 4);
    let mut previous_lower = false;

    for ch in tag.chars() {
        if ch.is_ascii_uppercase() && previous_lower {
            normalized.push('_');
        }
        previous_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        normalized.push(ch.to_ascii_uppercase());
    }

    normalized
}
