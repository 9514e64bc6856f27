//! Error types for wire-format operations

use thiserror::Error;

/// Wire-format errors
#[derive(Debug, Error)]
pub enum ProtoError {
    /// A payload field contains an interior NUL byte
    #[error("field `{field}` contains an interior NUL byte")]
    EmbeddedNul {
        /// Name of the offending field
        field: &'static str,
    },

    /// A required payload field is empty
    #[error("field `{field}` must not be empty")]
    EmptyField {
        /// Name of the offending field
        field: &'static str,
    },

    /// A payload could not be split back into its five fields
    #[error("malformed credential payload: {0}")]
    MalformedPayload(String),

    /// A decimal field did not parse as the expected integer type
    #[error("invalid decimal field `{field}`: {value:?}")]
    InvalidDecimal {
        /// Name of the offending field
        field: &'static str,
        /// The bytes that failed to parse
        value: String,
    },
}
