pub mod auth;
pub mod cart;
pub mod category;
pub mod product;
pub mod role;

use serde_json::Value;
use thiserror::Error;

use crate::types::response::{Envelope, FieldError};

/// Failure of a hard-error service call (cart, category, product, role).
/// The auth family deliberately uses the soft [`Outcome`] shape instead;
/// callers of each family depend on its convention.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        errors: Option<Vec<FieldError>>,
    },

    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// Soft result of an auth-family call: HTTP failures come back as
/// `success == false` with the normalized message and field errors, and
/// only transport faults become a real error.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub success: bool,
    pub message: Option<String>,
    pub errors: Option<Vec<FieldError>>,
    pub data: Option<Value>,
}

impl Outcome {
    pub fn ok(message: Option<String>, data: Option<Value>) -> Self {
        Self {
            success: true,
            message,
            errors: None,
            data,
        }
    }

    pub fn fail(envelope: &Envelope) -> Self {
        Self {
            success: false,
            message: envelope.message.clone(),
            errors: envelope.errors.clone(),
            data: None,
        }
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage {
    pub items: Vec<Value>,
    pub pagination: Option<Value>,
}

pub(crate) fn api_error(envelope: Envelope, fallback: &str) -> ServiceError {
    let message = envelope
        .message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string());
    ServiceError::Api {
        status: envelope.status,
        message,
        errors: envelope.errors,
    }
}

/// Unwraps a successful envelope or shapes its failure into an API error
/// carrying `fallback` when the backend gave nothing usable.
pub(crate) fn ensure_ok(envelope: Envelope, fallback: &str) -> Result<Value, ServiceError> {
    if envelope.ok {
        Ok(envelope.data)
    } else {
        Err(api_error(envelope, fallback))
    }
}

/// List endpoints answer either `{data: [...], pagination: {...}}` or a
/// bare array; anything else counts as an empty page. Some backends call
/// the pagination object `meta`.
pub(crate) fn unwrap_list(payload: Value) -> ListPage {
    let pagination = payload
        .get("pagination")
        .cloned()
        .or_else(|| payload.get("meta").cloned());

    ListPage {
        items: unwrap_array(payload),
        pagination,
    }
}

/// The array behind `{data: [...]}` or a bare array, else empty.
pub(crate) fn unwrap_array(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_unwrap_list() {
        let page = unwrap_list(json!({"data": [{"id": 1}], "pagination": {"page": 1}}));
        assert_eq!(page.items, vec![json!({"id": 1})]);
        assert_eq!(page.pagination, Some(json!({"page": 1})));

        let page = unwrap_list(json!([{"id": 1}]));
        assert_eq!(page.items, vec![json!({"id": 1})]);
        assert_eq!(page.pagination, None);

        let page = unwrap_list(json!({"data": [], "meta": {"total": 0}}));
        assert!(page.items.is_empty());
        assert_eq!(page.pagination, Some(json!({"total": 0})));

        let page = unwrap_list(json!({"unexpected": true}));
        assert!(page.items.is_empty());
        assert_eq!(page.pagination, None);
    }

    #[test]
    fn test_api_error_fallback() {
        let envelope = crate::types::response::normalize(500, "{}");
        let err = api_error(envelope, "Unable to do the thing");
        match err {
            ServiceError::Api {
                status, message, ..
            } => {
                assert_eq!(status, 500);
                // The normalizer always yields a message, so the fallback
                // only covers an explicitly empty one.
                assert_eq!(message, "HTTP 500");
            }
            ServiceError::Transport(_) => panic!("expected api error"),
        }
    }
}
