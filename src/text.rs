use serde_json::Value;

use crate::error::LookupError;

pub const DESCRIPTION_MAX_LEN: usize = 800;

const ELLIPSIS: &str = "...";

/// Shortens a description to fit `max_len` characters.
///
/// Text that already fits is returned untouched. Longer text is split on `.` and the first
/// half of the pieces is kept, over and over, until it fits; the result then gets a trailing
/// `...`. The halving is coarse on purpose and can throw away far more than needed.
pub fn truncate_description(text: Option<&str>, max_len: usize) -> Option<String> {
    let text = text?;
    if text.chars().count() <= max_len {
        return Some(text.to_string());
    }

    let mut current = text.to_string();
    while current.chars().count() > max_len {
        let sentences: Vec<&str> = current.split('.').collect();
        let keep = sentences.len() / 2;
        current = sentences[..keep].join(".");
    }
    current.push_str(ELLIPSIS);
    Some(current)
}

pub fn coerce_int(field: &'static str, value: Option<&Value>) -> Result<Option<i64>, LookupError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .map(Some)
            .ok_or_else(|| coercion(field, value)),
        Some(Value::String(s)) => {
            s.trim().parse::<i64>().map(Some).map_err(|_| coercion(field, value))
        },
        Some(_) => Err(coercion(field, value)),
    }
}

pub fn coerce_float(
    field: &'static str,
    value: Option<&Value>,
) -> Result<Option<f64>, LookupError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(|| coercion(field, value)),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Some)
            .ok_or_else(|| coercion(field, value)),
        Some(_) => Err(coercion(field, value)),
    }
}

fn coercion(field: &'static str, value: Option<&Value>) -> LookupError {
    LookupError::Coercion {
        field,
        value: value.map(|v| v.to_string()).unwrap_or_default(),
    }
}
