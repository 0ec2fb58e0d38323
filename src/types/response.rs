use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uniform result of one HTTP call. `message` and `errors` are only
/// populated when `ok` is false.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub ok: bool,
    pub status: u16,
    pub data: Value,
    pub message: Option<String>,
    pub errors: Option<Vec<FieldError>>,
}

/// One structured validation failure, optionally tied to a field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Option<String>,
    pub message: String,
}

/// Converts a raw HTTP response into an [`Envelope`].
///
/// Backends behind this client disagree on error shapes: top-level
/// `message`, `error`, arrays of strings, arrays of objects, and errors
/// nested under `data`. This is the single place where all of them are
/// flattened into one shape, so a body that fails to parse as JSON is
/// treated as `{}` rather than reported as a failure of its own.
pub fn normalize(status: u16, body: &str) -> Envelope {
    let data: Value =
        serde_json::from_str(body).unwrap_or_else(|_| Value::Object(Default::default()));
    let ok = (200..300).contains(&status);

    if ok {
        return Envelope {
            ok,
            status,
            data,
            message: None,
            errors: None,
        };
    }

    let message = message_from(data.get("message"))
        .or_else(|| message_from(data.get("error")))
        .or_else(|| message_from(data.get("errors").and_then(|e| e.get("message"))))
        .unwrap_or_else(|| format!("HTTP {status}"));
    let errors = field_errors(&data);

    Envelope {
        ok,
        status,
        data,
        message: Some(message),
        errors,
    }
}

fn message_from(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let joined = items
                .iter()
                .map(element_text)
                .collect::<Vec<_>>()
                .join(", ");
            if joined.is_empty() {
                None
            } else {
                Some(joined)
            }
        }
        Value::Object(map) => match map.get("message").and_then(Value::as_str) {
            Some(s) if !s.is_empty() => Some(s.to_string()),
            _ => Some(Value::Object(map.clone()).to_string()),
        },
        other => Some(other.to_string()),
    }
}

fn element_text(element: &Value) -> String {
    match element {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("message").and_then(Value::as_str) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => element.to_string(),
        },
        other => other.to_string(),
    }
}

fn field_errors(body: &Value) -> Option<Vec<FieldError>> {
    let items = body
        .get("errors")
        .and_then(Value::as_array)
        .or_else(|| {
            body.get("data")
                .and_then(|d| d.get("errors"))
                .and_then(Value::as_array)
        })?;

    Some(items.iter().map(field_error).collect())
}

fn field_error(element: &Value) -> FieldError {
    let field = field_name(element.get("field"))
        .or_else(|| field_name(element.get("path")))
        .or_else(|| field_name(element.get("param")));

    let message = match element.get("message").and_then(Value::as_str) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => element_text(element),
    };

    FieldError { field, message }
}

fn field_name(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        // Some validators report the field as a path segment list.
        Value::Array(segments) => Some(
            segments
                .iter()
                .map(|s| match s {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("."),
        ),
        _ => None,
    }
}
