//! Unified error types for EIP-712 encoding
//!
//! All errors flow through this module; every failure is fatal at the
//! point of detection and propagates unchanged to the caller of the
//! top-level operation.

/// Errors that can occur during EIP-712 operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum Eip712Error {
    /// A struct type referenced by a field, the primary type, or
    /// `EIP712Domain` is not declared in `types`.
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// A field's type string is not a recognized EIP-712 type.
    #[error("Invalid type: {0}")]
    InvalidType(String),

    /// A record is missing a field declared by its struct type.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// A value's runtime shape does not match its declared type.
    #[error("Invalid value for type {type_name}: {value}")]
    InvalidValue { type_name: String, value: String },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
}

/// Result type alias for EIP-712 operations
pub type Eip712Result<T> = Result<T, Eip712Error>;
