//! Typed errors for the CandiDash API.
//!
//! The wizard treats every failure the same way (log + notice), so the
//! variants exist for message quality and for the few places that care
//! whether the session is stale (404) or the token expired (401).

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// 401 - token missing, invalid, or expired.
    #[error("unauthorized (401): log in again with `candidash login`")]
    Unauthorized,

    /// 403 - the record belongs to another account or the account is inactive.
    #[error("forbidden (403): {message}")]
    Forbidden { message: String },

    /// 404 - the referenced record no longer exists.
    #[error("not found (404): {message}")]
    NotFound { message: String },

    /// 422 - the server rejected the payload.
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// Any other non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Connection, DNS, or timeout failure before a status was received.
    #[error("network error: {message}")]
    Network { message: String },

    /// No token stored; `candidash login` has not been run.
    #[error("not logged in: run `candidash login` first")]
    NotAuthenticated,
}

impl ApiError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
        }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        ApiError::Http {
            status,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        ApiError::Network {
            message: message.into(),
        }
    }

    /// Map a non-success response to the matching variant.
    ///
    /// `body` is the raw response text; the server wraps its messages as
    /// `{"detail": ...}` where detail is a string or, for 422, a list of
    /// field errors.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = extract_detail(body);
        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden { message },
            404 => ApiError::NotFound { message },
            422 => ApiError::Validation { message },
            _ => ApiError::Http { status, message },
        }
    }

    /// True for 401/403, which both mean the stored token is unusable.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized | ApiError::Forbidden { .. } | ApiError::NotAuthenticated
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Validation { .. } => Some(422),
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Network { .. } | ApiError::NotAuthenticated => None,
        }
    }
}

/// Pull a readable message out of a FastAPI error body.
fn extract_detail(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return truncate(body);
    };
    match value.get("detail") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Array(items)) => {
            // 422 shape: [{"loc": [...], "msg": "...", ...}, ...]
            let msgs: Vec<String> = items
                .iter()
                .filter_map(|item| {
                    let msg = item.get("msg")?.as_str()?;
                    let field = item
                        .get("loc")
                        .and_then(|loc| loc.as_array())
                        .and_then(|loc| loc.last())
                        .and_then(|f| f.as_str());
                    Some(match field {
                        Some(f) => format!("{f}: {msg}"),
                        None => msg.to_string(),
                    })
                })
                .collect();
            if msgs.is_empty() {
                truncate(body)
            } else {
                msgs.join("; ")
            }
        }
        _ => truncate(body),
    }
}

fn truncate(body: &str) -> String {
    const MAX: usize = 200;
    let body = body.trim();
    if body.is_empty() {
        return "no response body".to_string();
    }
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_maps_statuses() {
        assert!(matches!(
            ApiError::from_response(401, r#"{"detail": "Could not validate credentials"}"#),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_response(404, r#"{"detail": "Application not found"}"#),
            ApiError::NotFound { .. }
        ));
        assert!(matches!(
            ApiError::from_response(500, "internal error"),
            ApiError::Http { status: 500, .. }
        ));
    }

    #[test]
    fn test_extracts_string_detail() {
        let err = ApiError::from_response(404, r#"{"detail": "Company with id 42 not found"}"#);
        assert_eq!(
            err.to_string(),
            "not found (404): Company with id 42 not found"
        );
    }

    #[test]
    fn test_extracts_validation_field_errors() {
        let body = r#"{"detail": [
            {"loc": ["body", "job_title"], "msg": "field required", "type": "value_error.missing"},
            {"loc": ["body", "application_date"], "msg": "invalid date format", "type": "value_error.date"}
        ]}"#;
        let err = ApiError::from_response(422, body);
        assert_eq!(
            err.to_string(),
            "validation failed: job_title: field required; application_date: invalid date format"
        );
    }

    #[test]
    fn test_non_json_body_is_kept_verbatim() {
        let err = ApiError::from_response(502, "Bad Gateway");
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }

    #[test]
    fn test_is_auth_error() {
        assert!(ApiError::Unauthorized.is_auth_error());
        assert!(ApiError::forbidden("inactive account").is_auth_error());
        assert!(ApiError::NotAuthenticated.is_auth_error());
        assert!(!ApiError::not_found("gone").is_auth_error());
        assert!(!ApiError::network("timeout").is_auth_error());
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(ApiError::Unauthorized.status(), Some(401));
        assert_eq!(ApiError::validation("bad").status(), Some(422));
        assert_eq!(ApiError::http(503, "unavailable").status(), Some(503));
        assert_eq!(ApiError::network("refused").status(), None);
    }

    #[test]
    fn test_long_body_is_truncated() {
        let body = "x".repeat(500);
        let err = ApiError::from_response(500, &body);
        let text = err.to_string();
        assert!(text.len() < 250);
        assert!(text.ends_with("..."));
    }
}
