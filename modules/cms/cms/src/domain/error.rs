use cms_sdk::CmsError;
use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid field type: '{value}'")]
    InvalidFieldType { value: String },

    #[error("{kind} '{name}' already exists")]
    DuplicateName { kind: String, name: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Invalid layout: {reason}")]
    InvalidLayout { reason: String },

    #[error("Type mismatch on '{field}': expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    #[error("Schema generation failed: {message}")]
    SchemaGeneration { message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invalid_field_type(value: impl Into<String>) -> Self {
        Self::InvalidFieldType {
            value: value.into(),
        }
    }

    pub fn duplicate_name(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            kind: kind.into(),
            name: name.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn invalid_layout(reason: impl Into<String>) -> Self {
        Self::InvalidLayout {
            reason: reason.into(),
        }
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn not_found(kind: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id: id.to_string(),
        }
    }

    pub fn schema_generation(message: impl Into<String>) -> Self {
        Self::SchemaGeneration {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

/// Convert domain errors to SDK errors for public API consumption.
impl From<DomainError> for CmsError {
    fn from(domain_error: DomainError) -> Self {
        match domain_error {
            DomainError::Validation { field, message } => {
                CmsError::validation(format!("{field}: {message}"))
            }
            DomainError::InvalidFieldType { value } => {
                CmsError::validation(format!("Invalid field type: {value}"))
            }
            DomainError::DuplicateName { kind, name } => CmsError::DuplicateName { kind, name },
            DomainError::Conflict { message } => CmsError::Conflict { message },
            DomainError::InvalidLayout { reason } => CmsError::InvalidLayout { reason },
            DomainError::TypeMismatch {
                field, expected, ..
            } => CmsError::TypeMismatch { field, expected },
            DomainError::NotFound { kind, id } => CmsError::NotFound { kind, id },
            DomainError::SchemaGeneration { .. } | DomainError::Database { .. } => {
                CmsError::internal()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_are_hidden_from_sdk_consumers() {
        let err: CmsError = DomainError::database("disk I/O error").into();
        assert_eq!(err, CmsError::Internal);
    }

    #[test]
    fn layout_errors_keep_their_reason() {
        let err: CmsError = DomainError::invalid_layout("duplicate field id").into();
        assert_eq!(
            err,
            CmsError::InvalidLayout {
                reason: "duplicate field id".to_owned()
            }
        );
    }
}
