//! Response normalization
//!
//! Turns raw status + body bytes into a typed [`ResponseEnvelope`]. The
//! platform wraps success paths in a standard `{message, data, time,
//! statusCode}` envelope; error paths may use bare `{detail}` or `{error}`
//! shapes, and non-JSON bodies are tolerated rather than failing the call.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use joblink_core::ErrorKind;

const FALLBACK_ERROR_MESSAGE: &str = "Request failed";

/// Decode result for the `data` field of an envelope.
///
/// A payload that is present but undecodable yields `Malformed` rather
/// than collapsing to the same state as "no data", so callers can tell
/// the two apart.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    Value(T),
    Absent,
    Malformed(String),
}

impl<T> Decoded<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Decoded::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Decoded::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Decoded::Malformed(_))
    }
}

/// Uniform result of one request, constructed once per exchange.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope<T> {
    pub success: bool,
    pub data: Decoded<T>,
    pub message: String,
    pub status_code: u16,
    pub time: DateTime<Utc>,
    pub errors: Option<serde_json::Map<String, Value>>,
    pub debug_info: Option<Value>,
    kind: Option<ErrorKind>,
}

impl<T> ResponseEnvelope<T> {
    /// Classification of a non-success envelope; `None` when successful.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.kind
    }

    /// Synthesized envelope for a transport-level fault or timeout.
    pub fn network_error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Decoded::Absent,
            message: message.into(),
            status_code: 500,
            time: Utc::now(),
            errors: None,
            debug_info: None,
            kind: Some(ErrorKind::Network),
        }
    }

    /// Terminal envelope returned after a failed token refresh.
    pub fn session_expired() -> Self {
        Self {
            success: false,
            data: Decoded::Absent,
            message: "Session expired".to_string(),
            status_code: 401,
            time: Utc::now(),
            errors: None,
            debug_info: None,
            kind: Some(ErrorKind::AuthExpired),
        }
    }
}

/// Match the token-expiry signature of a 401 body: a known error code, a
/// `detail` naming an invalid/expired token, or a `message` combining
/// "token" with an expiry word.
pub fn matches_token_expiry(body: &Value) -> bool {
    if body.get("code").and_then(Value::as_str) == Some("token_not_valid") {
        return true;
    }
    if let Some(detail) = body.get("detail").and_then(Value::as_str) {
        let detail = detail.to_lowercase();
        if detail.contains("token not valid")
            || detail.contains("token is expired")
            || detail.contains("token is invalid")
        {
            return true;
        }
    }
    if let Some(message) = body.get("message").and_then(Value::as_str) {
        let message = message.to_lowercase();
        if message.contains("token")
            && (message.contains("expired")
                || message.contains("invalid")
                || message.contains("not valid"))
        {
            return true;
        }
    }
    false
}

fn classify(status: u16, body: Option<&Value>) -> Option<ErrorKind> {
    match status {
        200..=299 => None,
        401 | 403 => {
            if body.map(matches_token_expiry).unwrap_or(false) {
                Some(ErrorKind::AuthExpired)
            } else {
                Some(ErrorKind::AuthDenied)
            }
        }
        400..=499 => Some(ErrorKind::Validation),
        _ => Some(ErrorKind::Server),
    }
}

fn decode_data<T: DeserializeOwned>(value: Value) -> Decoded<T> {
    match serde_json::from_value::<T>(value) {
        Ok(decoded) => Decoded::Value(decoded),
        Err(e) => {
            tracing::warn!(error = %e, "response data did not match expected shape");
            Decoded::Malformed(e.to_string())
        }
    }
}

/// Normalize a raw response into a typed envelope.
pub fn normalize<T: DeserializeOwned>(status: u16, body: &[u8]) -> ResponseEnvelope<T> {
    let http_ok = (200..300).contains(&status);
    let text = String::from_utf8_lossy(body).into_owned();

    let parsed: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            // Non-JSON bodies degrade to a textual envelope.
            return if http_ok {
                ResponseEnvelope {
                    success: true,
                    data: Decoded::Absent,
                    message: text,
                    status_code: status,
                    time: Utc::now(),
                    errors: None,
                    debug_info: None,
                    kind: None,
                }
            } else {
                ResponseEnvelope {
                    success: false,
                    data: Decoded::Absent,
                    message: format!("Failed to parse response: {}", e),
                    status_code: status,
                    time: Utc::now(),
                    errors: None,
                    debug_info: Some(Value::String(text)),
                    kind: Some(ErrorKind::Parse),
                }
            };
        }
    };

    let standard_envelope = parsed
        .as_object()
        .map(|map| map.contains_key("message") || map.contains_key("data"))
        .unwrap_or(false);

    if standard_envelope {
        let map = parsed.as_object().cloned().unwrap_or_default();
        let effective_status = map
            .get("statusCode")
            .and_then(Value::as_u64)
            .map(|s| s as u16)
            .unwrap_or(status);
        let ok = (200..300).contains(&effective_status);

        let message = map
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let time = map
            .get("time")
            .and_then(Value::as_str)
            .and_then(|t| t.parse::<DateTime<Utc>>().ok())
            .unwrap_or_else(Utc::now);
        let errors = map.get("errors").and_then(Value::as_object).cloned();

        let data = if ok {
            match map.get("data") {
                None | Some(Value::Null) => Decoded::Absent,
                Some(value) => decode_data(value.clone()),
            }
        } else {
            Decoded::Absent
        };

        let kind = classify(effective_status, Some(&parsed));
        return ResponseEnvelope {
            success: ok,
            data,
            message,
            status_code: effective_status,
            time,
            errors,
            debug_info: None,
            kind,
        };
    }

    if http_ok {
        // No standard envelope keys: a 2xx is an implicit success whose
        // whole payload is the data.
        ResponseEnvelope {
            success: true,
            data: decode_data(parsed),
            message: String::new(),
            status_code: status,
            time: Utc::now(),
            errors: None,
            debug_info: None,
            kind: None,
        }
    } else {
        let message = parsed
            .get("detail")
            .and_then(Value::as_str)
            .or_else(|| parsed.get("message").and_then(Value::as_str))
            .or_else(|| parsed.get("error").and_then(Value::as_str))
            .unwrap_or(FALLBACK_ERROR_MESSAGE)
            .to_string();
        let errors = parsed.get("errors").and_then(Value::as_object).cloned();
        let kind = classify(status, Some(&parsed));
        ResponseEnvelope {
            success: false,
            data: Decoded::Absent,
            message,
            status_code: status,
            time: Utc::now(),
            errors,
            debug_info: Some(parsed),
            kind,
        }
    }
}
