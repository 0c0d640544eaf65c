//! EIP-712 Hashing
//!
//! Struct hashing, domain separation, and assembly of the final signable
//! pre-image:
//!
//! ```text
//! message = "\x19\x01" || hashStruct(domain) || hashStruct(message)
//! hash    = keccak256(message)
//! ```

use std::collections::HashMap;

use serde_json::Value;

use crate::encoder::{encode_data, keccak256};
use crate::error::Eip712Result;
use crate::types::{TypedData, TypedDataField};

/// Magic prefix for EIP-712 encoding
const EIP712_PREFIX: &[u8] = b"\x19\x01";

/// Hash a struct according to EIP-712
///
/// hashStruct(s) = keccak256(typeHash || encodeData(s))
pub fn hash_struct(
    type_name: &str,
    data: &Value,
    types: &HashMap<String, Vec<TypedDataField>>,
) -> Eip712Result<[u8; 32]> {
    let encoded = encode_data(type_name, data, types)?;
    Ok(keccak256(&encoded))
}

/// Calculate the domain separator hash
///
/// The domain record is hashed against the schema's `EIP712Domain` entry
/// through the same path as any other struct.
pub fn domain_separator(typed_data: &TypedData) -> Eip712Result<[u8; 32]> {
    hash_struct("EIP712Domain", &typed_data.domain, &typed_data.types)
}

/// Assemble the signable pre-image for a typed data document
///
/// The result is always exactly 66 bytes: the two-byte prefix, the
/// domain separator, and the primary struct hash. Hashing the pre-image
/// yields the value actually signed; that final hash is left to the
/// caller (or [`hash_typed_data`]).
pub fn encode_message(typed_data: &TypedData) -> Eip712Result<[u8; 66]> {
    typed_data.validate()?;

    let domain_hash = domain_separator(typed_data)?;
    let struct_hash = hash_struct(
        &typed_data.primary_type,
        &typed_data.message,
        &typed_data.types,
    )?;

    let mut message = [0u8; 66];
    message[..2].copy_from_slice(EIP712_PREFIX);
    message[2..34].copy_from_slice(&domain_hash);
    message[34..].copy_from_slice(&struct_hash);
    Ok(message)
}

/// Calculate the final EIP-712 hash for signing
///
/// hash = keccak256("\x19\x01" || domainSeparator || hashStruct(message))
pub fn hash_typed_data(typed_data: &TypedData) -> Eip712Result<[u8; 32]> {
    Ok(keccak256(&encode_message(typed_data)?))
}

/// The pre-image components (for external signing)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eip712PreImage {
    pub domain_separator: [u8; 32],
    pub struct_hash: [u8; 32],
    pub final_hash: [u8; 32],
}

/// Calculate the pre-image components for EIP-712
pub fn get_pre_image(typed_data: &TypedData) -> Eip712Result<Eip712PreImage> {
    let message = encode_message(typed_data)?;

    let mut domain_separator = [0u8; 32];
    let mut struct_hash = [0u8; 32];
    domain_separator.copy_from_slice(&message[2..34]);
    struct_hash.copy_from_slice(&message[34..]);

    Ok(Eip712PreImage {
        domain_separator,
        struct_hash,
        final_hash: keccak256(&message),
    })
}

#[cfg(test)]
mod hasher_tests {
    use super::*;

    fn create_mail_example() -> TypedData {
        let json = r#"{
            "types": {
                "EIP712Domain": [
                    {"name": "name", "type": "string"},
                    {"name": "version", "type": "string"},
                    {"name": "chainId", "type": "uint256"},
                    {"name": "verifyingContract", "type": "address"}
                ],
                "Person": [
                    {"name": "name", "type": "string"},
                    {"name": "wallet", "type": "address"}
                ],
                "Mail": [
                    {"name": "from", "type": "Person"},
                    {"name": "to", "type": "Person"},
                    {"name": "contents", "type": "string"}
                ]
            },
            "primaryType": "Mail",
            "domain": {
                "name": "Ether Mail",
                "version": "1",
                "chainId": 1,
                "verifyingContract": "0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC"
            },
            "message": {
                "from": {
                    "name": "Cow",
                    "wallet": "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826"
                },
                "to": {
                    "name": "Bob",
                    "wallet": "0xbBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB"
                },
                "contents": "Hello, Bob!"
            }
        }"#;

        TypedData::from_json(json).unwrap()
    }

    #[test]
    fn test_encode_message_framing() {
        let typed_data = create_mail_example();
        let message = encode_message(&typed_data).unwrap();

        assert_eq!(message.len(), 66);
        assert_eq!(&message[..2], &[0x19, 0x01]);
        assert_eq!(&message[2..34], &domain_separator(&typed_data).unwrap());
        assert_eq!(
            &message[34..],
            &hash_struct("Mail", &typed_data.message, &typed_data.types).unwrap()
        );
    }

    #[test]
    fn test_hash_typed_data_mail() {
        let typed_data = create_mail_example();
        let hash = hash_typed_data(&typed_data).unwrap();

        // Expected hash from the EIP-712 specification example
        let expected = "be609aee343fb3c4b28e1df9e632fca64fcfaede20f02e86244efddf30957bd2";
        assert_eq!(hex::encode(hash), expected);
    }

    #[test]
    fn test_get_pre_image() {
        let typed_data = create_mail_example();
        let pre_image = get_pre_image(&typed_data).unwrap();

        assert_eq!(pre_image.domain_separator, domain_separator(&typed_data).unwrap());
        assert_eq!(pre_image.final_hash, hash_typed_data(&typed_data).unwrap());
    }

    #[test]
    fn test_encode_message_requires_domain_type() {
        let mut typed_data = create_mail_example();
        typed_data.types.remove("EIP712Domain");

        assert!(encode_message(&typed_data).is_err());
    }
}
