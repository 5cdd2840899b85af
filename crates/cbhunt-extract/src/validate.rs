//! Shape validation for parsed model output.
//!
//! The validator only inspects. A value either conforms and is returned
//! untouched, or the first violation is reported with its path.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ValidationError;
use crate::schema::Shape;

/// Checks `value` against `shape` and returns it unchanged if it conforms.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found, depth first.
pub fn validate_value(value: Value, shape: &Shape) -> Result<Value, ValidationError> {
    check(&value, shape, "$")?;
    Ok(value)
}

/// Validates `value` against `shape` and converts it into `T`.
///
/// Null members are treated as absent during conversion, so optional fields
/// declared `| null` land as `None` or their default.
///
/// # Errors
///
/// Returns [`ValidationError`] when the value does not conform or cannot be
/// represented as `T`.
pub fn validate_as<T: DeserializeOwned>(value: Value, shape: &Shape) -> Result<T, ValidationError> {
    check(&value, shape, "$")?;
    serde_json::from_value(drop_nulls(value)).map_err(|e| ValidationError::new("$", e.to_string()))
}

fn check(value: &Value, shape: &Shape, path: &str) -> Result<(), ValidationError> {
    match shape {
        Shape::String => match value {
            Value::String(_) => Ok(()),
            other => Err(type_error(path, "string", other)),
        },
        Shape::Number => match value {
            Value::Number(_) => Ok(()),
            other => Err(type_error(path, "number", other)),
        },
        Shape::Range { min, max } => {
            let Some(n) = value.as_f64() else {
                return Err(type_error(path, "number", value));
            };
            if n < *min || n > *max {
                return Err(ValidationError::new(
                    path,
                    format!("{n} is outside {min}..={max}"),
                ));
            }
            Ok(())
        }
        Shape::Enum(allowed) => match value {
            Value::String(s) if allowed.contains(&s.as_str()) => Ok(()),
            Value::String(s) => Err(ValidationError::new(
                path,
                format!("\"{s}\" is not one of {}", allowed.join(", ")),
            )),
            other => Err(type_error(path, "string", other)),
        },
        Shape::Array { items, min_items } => {
            let Value::Array(elements) = value else {
                return Err(type_error(path, "array", value));
            };
            if elements.len() < *min_items {
                return Err(ValidationError::new(
                    path,
                    format!(
                        "expected at least {min_items} item(s), found {}",
                        elements.len()
                    ),
                ));
            }
            for (i, element) in elements.iter().enumerate() {
                check(element, items, &format!("{path}[{i}]"))?;
            }
            Ok(())
        }
        Shape::Map(values) => {
            let Value::Object(map) = value else {
                return Err(type_error(path, "object", value));
            };
            for (key, member) in map {
                check(member, values, &format!("{path}.{key}"))?;
            }
            Ok(())
        }
        Shape::Object(fields) => {
            let Value::Object(map) = value else {
                return Err(type_error(path, "object", value));
            };
            for field in fields {
                let field_path = format!("{path}.{}", field.name);
                match map.get(field.name) {
                    None | Some(Value::Null) if field.required => {
                        return Err(ValidationError::new(&field_path, "required field is missing"));
                    }
                    None | Some(Value::Null) => {}
                    Some(member) => check(member, &field.shape, &field_path)?,
                }
            }
            Ok(())
        }
    }
}

fn type_error(path: &str, expected: &str, found: &Value) -> ValidationError {
    let found = match found {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    ValidationError::new(path, format!("expected {expected}, found {found}"))
}

fn drop_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, drop_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(drop_nulls).collect()),
        other => other,
    }
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
