//! Envelope parsing and structural validation of `result`.
//!
//! # Design
//! serde handles required/optional fields and enum membership. Numeric
//! constraints (ranges, non-negativity) and URL checks live in `Validate`
//! impls so that a failure can name the exact path, e.g.
//! `result[0].difficulty`.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;

/// Constraint checks run after a successful deserialize.
pub trait Validate {
    fn validate(&self, path: &str) -> Result<(), ApiError>;
}

impl Validate for String {
    fn validate(&self, _path: &str) -> Result<(), ApiError> {
        Ok(())
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self, path: &str) -> Result<(), ApiError> {
        self.iter()
            .enumerate()
            .try_for_each(|(i, item)| item.validate(&format!("{path}[{i}]")))
    }
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self, path: &str) -> Result<(), ApiError> {
        self.as_ref().map_or(Ok(()), |inner| inner.validate(path))
    }
}

pub(crate) fn field(path: &str, name: &str) -> String {
    format!("{path}.{name}")
}

pub(crate) fn non_negative(path: &str, name: &str, value: i64) -> Result<(), ApiError> {
    if value < 0 {
        return Err(ApiError::invalid_response(
            field(path, name),
            format!("must be non-negative, got {value}"),
        ));
    }
    Ok(())
}

pub(crate) fn non_negative_opt(path: &str, name: &str, value: Option<i64>) -> Result<(), ApiError> {
    value.map_or(Ok(()), |v| non_negative(path, name, v))
}

pub(crate) fn positive(path: &str, name: &str, value: i64) -> Result<(), ApiError> {
    if value < 1 {
        return Err(ApiError::invalid_response(
            field(path, name),
            format!("must be positive, got {value}"),
        ));
    }
    Ok(())
}

pub(crate) fn in_range(
    path: &str,
    name: &str,
    value: i64,
    min: i64,
    max: i64,
) -> Result<(), ApiError> {
    if !(min..=max).contains(&value) {
        return Err(ApiError::invalid_response(
            field(path, name),
            format!("must be between {min} and {max}, got {value}"),
        ));
    }
    Ok(())
}

pub(crate) fn non_negative_f64(path: &str, name: &str, value: f64) -> Result<(), ApiError> {
    if !(value >= 0.0) {
        return Err(ApiError::invalid_response(
            field(path, name),
            format!("must be non-negative, got {value}"),
        ));
    }
    Ok(())
}

pub(crate) fn positive_f64(path: &str, name: &str, value: f64) -> Result<(), ApiError> {
    if !(value > 0.0) {
        return Err(ApiError::invalid_response(
            field(path, name),
            format!("must be positive, got {value}"),
        ));
    }
    Ok(())
}

pub(crate) fn http_url(path: &str, name: &str, value: &str) -> Result<(), ApiError> {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') => Ok(()),
        _ => Err(ApiError::invalid_response(
            field(path, name),
            format!("not an http(s) URL: {value:?}"),
        )),
    }
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    status: Option<Value>,
    result: Option<Value>,
    comment: Option<Value>,
}

/// Parse a response body and decode `result` into `T`.
///
/// A `FAILED` envelope becomes `ApiError::Api`; every structural problem
/// becomes `ApiError::ResponseValidation`. `result` belongs only to `OK` and
/// `comment` only to `FAILED`; a null counts as absent.
pub fn decode_envelope<T>(body: &str) -> Result<T, ApiError>
where
    T: DeserializeOwned + Validate,
{
    let envelope: RawEnvelope = serde_json::from_str(body)
        .map_err(|e| ApiError::invalid_response("$", format!("not a JSON envelope: {e}")))?;

    match envelope.status.as_ref().and_then(Value::as_str) {
        Some("OK") => {
            if envelope.comment.is_some() {
                return Err(ApiError::invalid_response("comment", "unexpected for status OK"));
            }
            let result = envelope
                .result
                .ok_or_else(|| ApiError::invalid_response("result", "missing for status OK"))?;
            let decoded: T = serde_json::from_value(result)
                .map_err(|e| ApiError::invalid_response("result", e.to_string()))?;
            decoded.validate("result")?;
            Ok(decoded)
        }
        Some("FAILED") if envelope.result.is_some() => Err(ApiError::invalid_response(
            "result",
            "unexpected for status FAILED",
        )),
        Some("FAILED") => match envelope.comment {
            Some(Value::String(comment)) => Err(ApiError::Api { comment }),
            _ => Err(ApiError::invalid_response(
                "comment",
                "missing or not a string for status FAILED",
            )),
        },
        Some(other) => Err(ApiError::invalid_response(
            "status",
            format!("expected OK or FAILED, got {other:?}"),
        )),
        None => Err(ApiError::invalid_response("status", "missing or not a string")),
    }
}
