//! The closed set of field types and the typed values they store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of a schema field. The set is closed: adding a kind must touch every
/// `match` over it (storage kind, coercion, OpenAPI shape, rendering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Text,
    Integer,
    Boolean,
    Media,
    Relation,
    Component,
    Markdown,
}

impl FieldType {
    pub const ALL: [FieldType; 8] = [
        FieldType::String,
        FieldType::Text,
        FieldType::Integer,
        FieldType::Boolean,
        FieldType::Media,
        FieldType::Relation,
        FieldType::Component,
        FieldType::Markdown,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
            FieldType::Media => "media",
            FieldType::Relation => "relation",
            FieldType::Component => "component",
            FieldType::Markdown => "markdown",
        }
    }

    /// Human-readable label used by admin UIs.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FieldType::String => "Short text",
            FieldType::Text => "Long text",
            FieldType::Integer => "Number",
            FieldType::Boolean => "True/False",
            FieldType::Media => "Media",
            FieldType::Relation => "Relation",
            FieldType::Component => "Component",
            FieldType::Markdown => "Markdown",
        }
    }

    /// Typed table a value of this field lands in.
    ///
    /// Markdown shares the text table with `text`; structured references
    /// (media, relation, component) are stored as normalized JSON text.
    #[must_use]
    pub fn value_kind(self) -> ValueKind {
        match self {
            FieldType::String => ValueKind::String,
            FieldType::Integer => ValueKind::Integer,
            FieldType::Boolean => ValueKind::Boolean,
            FieldType::Text
            | FieldType::Markdown
            | FieldType::Media
            | FieldType::Relation
            | FieldType::Component => ValueKind::Text,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name one of the known field types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field type '{0}'")]
pub struct UnknownFieldType(pub String);

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownFieldType(s.to_owned()))
    }
}

/// Display width of a field in the two-column editor grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldWidth {
    #[default]
    Full,
    Half,
}

impl FieldWidth {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FieldWidth::Full => "full",
            FieldWidth::Half => "half",
        }
    }
}

impl FromStr for FieldWidth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(FieldWidth::Full),
            "half" => Ok(FieldWidth::Half),
            other => Err(format!("unknown width '{other}'")),
        }
    }
}

impl fmt::Display for FieldWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminator of the typed value tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Text,
    Boolean,
    Integer,
}

impl ValueKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Text => "text",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
        }
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(ValueKind::String),
            "text" => Ok(ValueKind::Text),
            "boolean" => Ok(ValueKind::Boolean),
            "integer" => Ok(ValueKind::Integer),
            other => Err(format!("unknown value kind '{other}'")),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored field value, tagged by the table it lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    String(String),
    Text(String),
    Boolean(bool),
    Integer(i64),
}

impl FieldValue {
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::String(_) => ValueKind::String,
            FieldValue::Text(_) => ValueKind::Text,
            FieldValue::Boolean(_) => ValueKind::Boolean,
            FieldValue::Integer(_) => ValueKind::Integer,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) | FieldValue::Text(s) => Some(s),
            FieldValue::Boolean(_) | FieldValue::Integer(_) => None,
        }
    }
}
