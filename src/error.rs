use miette::Diagnostic;
use thiserror::Error;

/// Main error type for stylefn operations
#[derive(Error, Diagnostic, Debug)]
pub enum StyleError {
    #[error("type mismatch: expected {expected}, found {found}")]
    #[diagnostic(code(stylefn::type_mismatch))]
    TypeMismatch {
        expected: String,
        found: String,
    },

    #[error("duplicate stop key: {key}")]
    #[diagnostic(code(stylefn::duplicate_key))]
    DuplicateKey {
        key: String,
    },

    #[error("not found: {name}")]
    #[diagnostic(code(stylefn::not_found))]
    NotFound {
        name: String,
    },

    #[error("no stop matches {input} and no default value is set")]
    #[diagnostic(code(stylefn::no_matching_stop))]
    NoMatchingStop {
        input: String,
    },

    #[error("attribute '{attribute}' is absent and no default value is set")]
    #[diagnostic(code(stylefn::missing_attribute))]
    MissingAttribute {
        attribute: String,
    },

    #[error("property '{property}' cannot hold this value: {message}")]
    #[diagnostic(code(stylefn::property_type_mismatch))]
    PropertyTypeMismatch {
        property: String,
        message: String,
    },

    #[error("malformed record: {message}")]
    #[diagnostic(code(stylefn::malformed_record))]
    MalformedRecord {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("IO error: {0}")]
    #[diagnostic(code(stylefn::io))]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    #[diagnostic(code(stylefn::json))]
    Json(#[from] serde_json::Error),
}

impl StyleError {
    /// Shorthand for a malformed record error without help text.
    pub fn malformed(message: impl Into<String>) -> Self {
        StyleError::MalformedRecord {
            message: message.into(),
            help: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, StyleError>;
