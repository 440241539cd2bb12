//! Field type dispatch for stored values: coercion of raw JSON input into a
//! typed [`FieldValue`] and rendering back into JSON.

use cms_sdk::{Field, FieldType, FieldValue};
use serde_json::{Map, Value, json};

use super::error::DomainError;

/// Short description of a JSON value used in mismatch errors.
fn json_kind(raw: &Value) -> &'static str {
    match raw {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(field: &Field, expected: &str, raw: &Value) -> DomainError {
    DomainError::type_mismatch(&field.name, expected, json_kind(raw))
}

/// Coerce `raw` into the storage value of `field`.
pub fn coerce(field: &Field, raw: &Value) -> Result<FieldValue, DomainError> {
    match field.field_type {
        FieldType::String => match raw {
            Value::String(s) => Ok(FieldValue::String(s.clone())),
            other => Err(mismatch(field, "string", other)),
        },
        FieldType::Text | FieldType::Markdown => match raw {
            Value::String(s) => Ok(FieldValue::Text(s.clone())),
            other => Err(mismatch(field, "string", other)),
        },
        FieldType::Integer => coerce_integer(raw)
            .map(FieldValue::Integer)
            .ok_or_else(|| mismatch(field, "integer", raw)),
        FieldType::Boolean => coerce_boolean(raw)
            .map(FieldValue::Boolean)
            .ok_or_else(|| mismatch(field, "boolean", raw)),
        FieldType::Media => normalize_media(raw)
            .map(|v| FieldValue::Text(v.to_string()))
            .ok_or_else(|| mismatch(field, "media url or object with 'url'", raw)),
        FieldType::Relation => normalize_relation(raw)
            .map(|v| FieldValue::Text(v.to_string()))
            .ok_or_else(|| mismatch(field, "relation id or object with 'id'", raw)),
        FieldType::Component => match raw {
            Value::Object(_) => Ok(FieldValue::Text(raw.to_string())),
            other => Err(mismatch(field, "object", other)),
        },
    }
}

fn coerce_integer(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_boolean(raw: &Value) -> Option<bool> {
    match raw {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn optional_str(obj: &Map<String, Value>, key: &str) -> Option<Option<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(s)) => Some(Some(s.clone())),
        Some(_) => None,
    }
}

fn normalize_media(raw: &Value) -> Option<Value> {
    match raw {
        Value::String(url) if !url.is_empty() => {
            Some(json!({ "url": url, "filename": null, "content_type": null }))
        }
        Value::Object(obj) => {
            let url = obj.get("url")?.as_str().filter(|u| !u.is_empty())?;
            let filename = optional_str(obj, "filename")?;
            let content_type = optional_str(obj, "content_type")?;
            Some(json!({ "url": url, "filename": filename, "content_type": content_type }))
        }
        _ => None,
    }
}

fn normalize_relation(raw: &Value) -> Option<Value> {
    match raw {
        Value::String(id) if !id.is_empty() => Some(json!({ "id": id, "title": null })),
        Value::Object(obj) => {
            let id = match obj.get("id")? {
                Value::String(s) if !s.is_empty() => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            let title = optional_str(obj, "title")?;
            Some(json!({ "id": id, "title": title }))
        }
        _ => None,
    }
}

/// Render a stored value as JSON for API output.
#[must_use]
pub fn render(field_type: FieldType, value: &FieldValue) -> Value {
    match (field_type, value) {
        (_, FieldValue::Integer(i)) => json!(i),
        (_, FieldValue::Boolean(b)) => json!(b),
        (FieldType::Media | FieldType::Relation | FieldType::Component, FieldValue::Text(s)) => {
            serde_json::from_str(s).unwrap_or_else(|_| Value::String(s.clone()))
        }
        (_, FieldValue::String(s) | FieldValue::Text(s)) => Value::String(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms_sdk::{FieldOwner, FieldWidth};
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn field(field_type: FieldType) -> Field {
        let now = OffsetDateTime::now_utc();
        Field {
            id: Uuid::now_v7(),
            owner: FieldOwner::ContentType(Uuid::now_v7()),
            name: "f".to_owned(),
            field_type,
            description: None,
            required: false,
            options: Map::new(),
            position: 1,
            width: FieldWidth::Full,
            row_group: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn boolean_accepts_common_spellings() {
        let f = field(FieldType::Boolean);
        assert_eq!(coerce(&f, &json!(true)).unwrap(), FieldValue::Boolean(true));
        assert_eq!(coerce(&f, &json!("0")).unwrap(), FieldValue::Boolean(false));
        assert_eq!(coerce(&f, &json!(1)).unwrap(), FieldValue::Boolean(true));
    }

    #[test]
    fn boolean_rejects_free_text() {
        let err = coerce(&field(FieldType::Boolean), &json!("yes please")).unwrap_err();
        assert!(matches!(err, DomainError::TypeMismatch { ref expected, .. } if expected == "boolean"));
    }

    #[test]
    fn null_is_a_mismatch_for_every_type() {
        for t in FieldType::ALL {
            assert!(coerce(&field(t), &Value::Null).is_err(), "{t} accepted null");
        }
    }

    #[test]
    fn integer_parses_numeric_strings() {
        let f = field(FieldType::Integer);
        assert_eq!(coerce(&f, &json!("42")).unwrap(), FieldValue::Integer(42));
        assert_eq!(coerce(&f, &json!(-7)).unwrap(), FieldValue::Integer(-7));
        assert!(coerce(&f, &json!(1.5)).is_err());
        assert!(coerce(&f, &json!("forty")).is_err());
    }

    #[test]
    fn markdown_is_stored_as_text() {
        let v = coerce(&field(FieldType::Markdown), &json!("# Title")).unwrap();
        assert_eq!(v, FieldValue::Text("# Title".to_owned()));
    }

    #[test]
    fn media_is_normalized() {
        let f = field(FieldType::Media);
        let v = coerce(&f, &json!("https://cdn/x.png")).unwrap();
        assert_eq!(
            render(FieldType::Media, &v),
            json!({ "url": "https://cdn/x.png", "filename": null, "content_type": null })
        );
        assert!(coerce(&f, &json!({ "filename": "x.png" })).is_err());
    }

    #[test]
    fn relation_accepts_object_with_id() {
        let f = field(FieldType::Relation);
        let v = coerce(&f, &json!({ "id": 12, "title": "Hello" })).unwrap();
        assert_eq!(
            render(FieldType::Relation, &v),
            json!({ "id": "12", "title": "Hello" })
        );
    }

    #[test]
    fn component_requires_object() {
        let f = field(FieldType::Component);
        assert!(coerce(&f, &json!("text")).is_err());
        let v = coerce(&f, &json!({ "caption": "c" })).unwrap();
        assert_eq!(render(FieldType::Component, &v), json!({ "caption": "c" }));
    }
}
