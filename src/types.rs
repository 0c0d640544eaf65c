//! EIP-712 Type Definitions
//!
//! The typed-data document model and the parsed form of field type
//! strings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{Eip712Error, Eip712Result};

/// A field in a struct type definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypedDataField {
    /// The name of the field
    pub name: String,
    /// The type of the field (e.g., "address", "uint256", "Person[]")
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Complete EIP-712 typed data document
///
/// `domain` must conform to the `EIP712Domain` entry of `types`;
/// `message` must conform to `primary_type`. Both are plain JSON records
/// hashed through the same schema-driven path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedData {
    /// Type definitions (struct name -> fields, field order significant)
    pub types: HashMap<String, Vec<TypedDataField>>,

    /// The name of the primary type being signed
    pub primary_type: String,

    /// The domain-separation record
    pub domain: serde_json::Value,

    /// The actual message data to sign
    pub message: serde_json::Value,
}

impl TypedData {
    /// Parse typed data from a JSON string
    pub fn from_json(json: &str) -> Eip712Result<Self> {
        serde_json::from_str(json).map_err(|e| Eip712Error::InvalidJson(e.to_string()))
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Eip712Result<String> {
        serde_json::to_string(self).map_err(|e| Eip712Error::InvalidJson(e.to_string()))
    }

    /// Validate the typed data structure
    ///
    /// Checks that the primary type and `EIP712Domain` are declared and
    /// that every field of every declared type has a parseable type
    /// string.
    pub fn validate(&self) -> Eip712Result<()> {
        if !self.types.contains_key(&self.primary_type) {
            return Err(Eip712Error::UnknownType(self.primary_type.clone()));
        }
        if !self.types.contains_key("EIP712Domain") {
            return Err(Eip712Error::UnknownType("EIP712Domain".to_string()));
        }

        for fields in self.types.values() {
            for field in fields {
                FieldType::parse(&field.type_name, &self.types)?;
            }
        }

        Ok(())
    }
}

/// Parsed form of a field's type string
///
/// Parsed once per field; encoding dispatches over this closed set of
/// value kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// 20-byte account address, left-padded to a slot
    Address,
    /// Boolean, encoded as 0 or 1
    Bool,
    /// Unsigned integer of the given bit width (8..=256, multiple of 8)
    Uint(usize),
    /// Signed integer of the given bit width, two's complement
    Int(usize),
    /// Fixed-size byte sequence `bytesN`, 1 <= N <= 32, right-padded
    FixedBytes(usize),
    /// Dynamic byte sequence, hashed into its slot
    Bytes,
    /// UTF-8 string, hashed into its slot
    String,
    /// Dynamic-length array `T[]`
    Array(Box<FieldType>),
    /// Fixed-length array `T[N]`
    FixedArray(Box<FieldType>, usize),
    /// Another struct type declared in the schema
    Struct(String),
}

impl FieldType {
    /// Parse a type string against a schema
    ///
    /// Array suffixes bind from the right: `uint256[4][]` is a dynamic
    /// array of fixed 4-element arrays. Unrecognized or out-of-range
    /// tags fail; nothing is guessed.
    pub fn parse(
        type_name: &str,
        types: &HashMap<String, Vec<TypedDataField>>,
    ) -> Eip712Result<Self> {
        let s = type_name.trim();

        if let Some(inner) = s.strip_suffix("[]") {
            return Ok(FieldType::Array(Box::new(Self::parse(inner, types)?)));
        }

        if s.ends_with(']') {
            let open = s
                .rfind('[')
                .ok_or_else(|| Eip712Error::InvalidType(s.to_string()))?;
            let len: usize = s[open + 1..s.len() - 1]
                .parse()
                .map_err(|_| Eip712Error::InvalidType(s.to_string()))?;
            let inner = Self::parse(&s[..open], types)?;
            return Ok(FieldType::FixedArray(Box::new(inner), len));
        }

        match s {
            "address" => return Ok(FieldType::Address),
            "bool" => return Ok(FieldType::Bool),
            "bytes" => return Ok(FieldType::Bytes),
            "string" => return Ok(FieldType::String),
            _ => {}
        }

        if types.contains_key(s) {
            return Ok(FieldType::Struct(s.to_string()));
        }

        if let Some(bits) = s.strip_prefix("uint") {
            let bits: usize = bits
                .parse()
                .map_err(|_| Eip712Error::InvalidType(s.to_string()))?;
            if bits == 0 || bits > 256 || bits % 8 != 0 {
                return Err(Eip712Error::InvalidType(s.to_string()));
            }
            return Ok(FieldType::Uint(bits));
        }

        if let Some(bits) = s.strip_prefix("int") {
            let bits: usize = bits
                .parse()
                .map_err(|_| Eip712Error::InvalidType(s.to_string()))?;
            if bits == 0 || bits > 256 || bits % 8 != 0 {
                return Err(Eip712Error::InvalidType(s.to_string()));
            }
            return Ok(FieldType::Int(bits));
        }

        if let Some(size) = s.strip_prefix("bytes") {
            let size: usize = size
                .parse()
                .map_err(|_| Eip712Error::InvalidType(s.to_string()))?;
            if size == 0 || size > 32 {
                return Err(Eip712Error::InvalidType(s.to_string()));
            }
            return Ok(FieldType::FixedBytes(size));
        }

        Err(Eip712Error::InvalidType(s.to_string()))
    }

    /// Get the canonical type string
    pub fn canonical_type(&self) -> String {
        match self {
            FieldType::Address => "address".to_string(),
            FieldType::Bool => "bool".to_string(),
            FieldType::Uint(bits) => format!("uint{}", bits),
            FieldType::Int(bits) => format!("int{}", bits),
            FieldType::FixedBytes(size) => format!("bytes{}", size),
            FieldType::Bytes => "bytes".to_string(),
            FieldType::String => "string".to_string(),
            FieldType::Array(inner) => format!("{}[]", inner.canonical_type()),
            FieldType::FixedArray(inner, len) => format!("{}[{}]", inner.canonical_type(), len),
            FieldType::Struct(name) => name.clone(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_type())
    }
}
