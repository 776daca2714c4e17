use thiserror::Error;

/// Broad category of a [`BindError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Structurally invalid type or field metadata
    Configuration,
    /// An XML value was rejected by its field's validator
    Value,
    /// The XML text could not be parsed into a tree
    Document,
    /// A bound instance could not be converted into a typed record
    Decode,
}

/// Main error type for descriptor resolution and binding
///
/// Cloneable so that a failed descriptor derivation can be handed out from the
/// descriptor cache to every caller waiting on the same type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    #[error("Configuration error in type {type_name}: {reason}")]
    Configuration { type_name: String, reason: String },

    #[error("Cannot assign value '{value}' to field {field} of type {type_name}")]
    Value {
        type_name: String,
        field: String,
        value: String,
    },

    #[error("XML parsing error: {details}")]
    Document { details: String },

    #[error("Failed to decode bound instance into {type_name}: {details}")]
    Decode { type_name: String, details: String },
}

impl BindError {
    pub fn configuration(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        BindError::Configuration {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    pub fn value(
        type_name: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        BindError::Value {
            type_name: type_name.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BindError::Configuration { .. } => ErrorKind::Configuration,
            BindError::Value { .. } => ErrorKind::Value,
            BindError::Document { .. } => ErrorKind::Document,
            BindError::Decode { .. } => ErrorKind::Decode,
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    pub fn is_value(&self) -> bool {
        self.kind() == ErrorKind::Value
    }
}

impl From<roxmltree::Error> for BindError {
    fn from(err: roxmltree::Error) -> Self {
        BindError::Document {
            details: err.to_string(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, BindError>;
