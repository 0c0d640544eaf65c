//! EIP-712 Type and Data Encoding
//!
//! Dependency resolution, canonical type strings, type hashes, and the
//! ABI-style data encoding that feeds struct hashing. Every field value
//! encodes to exactly one 32-byte slot; dynamic values (strings, byte
//! sequences, arrays) are replaced by their keccak256 digest.

use std::collections::{HashMap, HashSet};

use ethers_core::types::{I256, U256};
use serde_json::Value;
use tiny_keccak::{Hasher, Keccak};

use crate::error::{Eip712Error, Eip712Result};
use crate::types::{FieldType, TypedDataField};

/// Compute keccak256 hash
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// Get the base type from a potentially array type
/// e.g., "Person[]" -> "Person", "uint256[10]" -> "uint256"
pub fn get_base_type(type_name: &str) -> &str {
    if let Some(bracket_pos) = type_name.find('[') {
        &type_name[..bracket_pos]
    } else {
        type_name
    }
}

/// Find all struct types reachable from `type_name`, in discovery order
///
/// Depth-first over the fields of each visited type, in declaration
/// order; a type is recorded the first time it is discovered and never
/// revisited, so self-referential and cyclic schemas terminate. The
/// result always begins with `type_name` itself.
pub fn get_dependencies(
    type_name: &str,
    types: &HashMap<String, Vec<TypedDataField>>,
) -> Eip712Result<Vec<String>> {
    if !types.contains_key(type_name) {
        return Err(Eip712Error::UnknownType(type_name.to_string()));
    }

    let mut discovered = HashSet::new();
    let mut order = Vec::new();
    visit_dependencies(type_name, types, &mut discovered, &mut order);
    Ok(order)
}

fn visit_dependencies(
    type_name: &str,
    types: &HashMap<String, Vec<TypedDataField>>,
    discovered: &mut HashSet<String>,
    order: &mut Vec<String>,
) {
    if !discovered.insert(type_name.to_string()) {
        return;
    }
    order.push(type_name.to_string());

    if let Some(fields) = types.get(type_name) {
        for field in fields {
            let base_type = get_base_type(&field.type_name);
            if types.contains_key(base_type) && !discovered.contains(base_type) {
                visit_dependencies(base_type, types, discovered, order);
            }
        }
    }
}

/// Encode a type string for a struct type
///
/// Format: "TypeName(type1 name1,type2 name2,...)" for the primary type,
/// followed by each dependency in ascending byte order, concatenated with
/// no separator. Struct field types render by their bare name.
pub fn encode_type(
    type_name: &str,
    types: &HashMap<String, Vec<TypedDataField>>,
) -> Eip712Result<String> {
    let dependencies = get_dependencies(type_name, types)?;

    let mut sorted_deps: Vec<String> = dependencies.into_iter().skip(1).collect();
    sorted_deps.sort();

    let fields = types
        .get(type_name)
        .ok_or_else(|| Eip712Error::UnknownType(type_name.to_string()))?;
    let mut result = format_type_string(type_name, fields);

    for dep in sorted_deps {
        let dep_fields = types
            .get(&dep)
            .ok_or_else(|| Eip712Error::UnknownType(dep.clone()))?;
        result.push_str(&format_type_string(&dep, dep_fields));
    }

    Ok(result)
}

/// Format a single type string
fn format_type_string(type_name: &str, fields: &[TypedDataField]) -> String {
    let field_strs: Vec<String> = fields
        .iter()
        .map(|f| format!("{} {}", f.type_name, f.name))
        .collect();

    format!("{}({})", type_name, field_strs.join(","))
}

/// Calculate the type hash for a struct type
/// typeHash = keccak256(encodeType(typeOf(s)))
pub fn type_hash(
    type_name: &str,
    types: &HashMap<String, Vec<TypedDataField>>,
) -> Eip712Result<[u8; 32]> {
    let encoded = encode_type(type_name, types)?;
    Ok(keccak256(encoded.as_bytes()))
}

/// Encode a struct's data
///
/// Output is the type hash followed by one 32-byte slot per declared
/// field, in declaration order: `32 * (1 + field_count)` bytes total.
pub fn encode_data(
    type_name: &str,
    record: &Value,
    types: &HashMap<String, Vec<TypedDataField>>,
) -> Eip712Result<Vec<u8>> {
    let fields = types
        .get(type_name)
        .ok_or_else(|| Eip712Error::UnknownType(type_name.to_string()))?;
    let obj = record.as_object().ok_or_else(|| Eip712Error::InvalidValue {
        type_name: type_name.to_string(),
        value: record.to_string(),
    })?;

    let mut encoded = Vec::with_capacity(32 * (1 + fields.len()));
    encoded.extend_from_slice(&type_hash(type_name, types)?);

    for field in fields {
        let value = obj.get(&field.name).ok_or_else(|| {
            Eip712Error::MissingField(format!("{}.{}", type_name, field.name))
        })?;
        let field_type = FieldType::parse(&field.type_name, types)?;
        encoded.extend_from_slice(&encode_value(&field_type, value, types)?);
    }

    Ok(encoded)
}

/// Encode a single value into its 32-byte slot
pub fn encode_value(
    field_type: &FieldType,
    value: &Value,
    types: &HashMap<String, Vec<TypedDataField>>,
) -> Eip712Result<[u8; 32]> {
    match field_type {
        FieldType::Struct(name) => {
            let encoded = encode_data(name, value, types)?;
            Ok(keccak256(&encoded))
        }

        FieldType::String => {
            let s = as_str(field_type, value)?;
            Ok(keccak256(s.as_bytes()))
        }

        FieldType::Bytes => {
            let raw = parse_hex(as_str(field_type, value)?)?;
            Ok(keccak256(&raw))
        }

        FieldType::FixedBytes(size) => {
            let raw = parse_hex(as_str(field_type, value)?)?;
            if raw.len() > *size {
                return Err(Eip712Error::InvalidValue {
                    type_name: field_type.to_string(),
                    value: value.to_string(),
                });
            }
            let mut slot = [0u8; 32];
            slot[..raw.len()].copy_from_slice(&raw);
            Ok(slot)
        }

        FieldType::Bool => {
            let b = value.as_bool().ok_or_else(|| Eip712Error::InvalidValue {
                type_name: field_type.to_string(),
                value: value.to_string(),
            })?;
            let mut slot = [0u8; 32];
            slot[31] = if b { 1 } else { 0 };
            Ok(slot)
        }

        FieldType::Address => {
            let addr = parse_address(as_str(field_type, value)?)?;
            let mut slot = [0u8; 32];
            slot[12..].copy_from_slice(&addr);
            Ok(slot)
        }

        FieldType::Uint(_) => encode_uint(field_type, value),

        FieldType::Int(_) => encode_int(field_type, value),

        FieldType::Array(element) => encode_array(element, None, value, types),

        FieldType::FixedArray(element, len) => encode_array(element, Some(*len), value, types),
    }
}

/// Encode an array field into its slot
///
/// Each element encodes to its own 32-byte slot per its element-type
/// rule; the concatenation is hashed into the single slot for the field.
fn encode_array(
    element: &FieldType,
    expected_len: Option<usize>,
    value: &Value,
    types: &HashMap<String, Vec<TypedDataField>>,
) -> Eip712Result<[u8; 32]> {
    let items = value.as_array().ok_or_else(|| Eip712Error::InvalidValue {
        type_name: match expected_len {
            Some(len) => format!("{}[{}]", element, len),
            None => format!("{}[]", element),
        },
        value: value.to_string(),
    })?;

    if let Some(len) = expected_len {
        if items.len() != len {
            return Err(Eip712Error::InvalidValue {
                type_name: format!("{}[{}]", element, len),
                value: format!("array of length {}", items.len()),
            });
        }
    }

    let mut encoded = Vec::with_capacity(32 * items.len());
    for item in items {
        encoded.extend_from_slice(&encode_value(element, item, types)?);
    }

    Ok(keccak256(&encoded))
}

/// Encode an unsigned integer as a 32-byte big-endian slot
///
/// Accepts JSON numbers, decimal strings, and 0x-prefixed hex strings.
fn encode_uint(field_type: &FieldType, value: &Value) -> Eip712Result<[u8; 32]> {
    let parsed = match value {
        Value::Number(n) => {
            let u = n
                .as_u64()
                .ok_or_else(|| Eip712Error::InvalidNumber(n.to_string()))?;
            U256::from(u)
        }
        Value::String(s) => {
            if let Some(digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                U256::from_str_radix(digits, 16)
                    .map_err(|_| Eip712Error::InvalidNumber(s.clone()))?
            } else {
                U256::from_dec_str(s).map_err(|_| Eip712Error::InvalidNumber(s.clone()))?
            }
        }
        _ => {
            return Err(Eip712Error::InvalidValue {
                type_name: field_type.to_string(),
                value: value.to_string(),
            })
        }
    };

    let mut slot = [0u8; 32];
    parsed.to_big_endian(&mut slot);
    Ok(slot)
}

/// Encode a signed integer as a 32-byte big-endian two's-complement slot
fn encode_int(field_type: &FieldType, value: &Value) -> Eip712Result<[u8; 32]> {
    let parsed = match value {
        Value::Number(n) => {
            let i = n
                .as_i64()
                .ok_or_else(|| Eip712Error::InvalidNumber(n.to_string()))?;
            I256::from(i)
        }
        Value::String(s) => {
            let digits = s.strip_prefix('-').unwrap_or(s);
            if digits.starts_with("0x") || digits.starts_with("0X") {
                I256::from_hex_str(s).map_err(|_| Eip712Error::InvalidNumber(s.clone()))?
            } else {
                I256::from_dec_str(s).map_err(|_| Eip712Error::InvalidNumber(s.clone()))?
            }
        }
        _ => {
            return Err(Eip712Error::InvalidValue {
                type_name: field_type.to_string(),
                value: value.to_string(),
            })
        }
    };

    let mut slot = [0u8; 32];
    parsed.into_raw().to_big_endian(&mut slot);
    Ok(slot)
}

fn as_str<'a>(field_type: &FieldType, value: &'a Value) -> Eip712Result<&'a str> {
    value.as_str().ok_or_else(|| Eip712Error::InvalidValue {
        type_name: field_type.to_string(),
        value: value.to_string(),
    })
}

/// Parse an Ethereum address
fn parse_address(addr: &str) -> Eip712Result<[u8; 20]> {
    let addr = addr.strip_prefix("0x").unwrap_or(addr);

    if addr.len() != 40 {
        return Err(Eip712Error::InvalidAddress(format!(
            "invalid length: expected 40 hex chars, got {}",
            addr.len()
        )));
    }

    let bytes = hex::decode(addr).map_err(|e| Eip712Error::InvalidAddress(e.to_string()))?;

    let mut result = [0u8; 20];
    result.copy_from_slice(&bytes);
    Ok(result)
}

/// Parse a hex string (with or without 0x prefix)
fn parse_hex(s: &str) -> Eip712Result<Vec<u8>> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    let s = s.strip_prefix("0X").unwrap_or(s);

    hex::decode(s).map_err(|e| Eip712Error::InvalidHex(e.to_string()))
}
