//! EIP-712 Typed Structured Data Hashing
//!
//! Implementation of EIP-712 typed structured data hashing: given a
//! schema of named struct types, a domain-separation record, and a
//! message record, this crate produces the exact byte sequence that a
//! signer hashes and signs.
//!
//! The pipeline resolves each type's dependencies, renders the canonical
//! type signature string, hashes it into a type hash, encodes records
//! field by field into 32-byte slots (recursing into nested structs via
//! their struct hash), and assembles the `0x19 0x01`-prefixed pre-image.
//! Signing and key handling are out of scope; every operation is a
//! synchronous pure function over its arguments.
//!
//! # Reference
//! - <https://eips.ethereum.org/EIPS/eip-712>
//!
//! # Example
//! ```rust,ignore
//! use eip712::{TypedData, encode_message, hash_typed_data};
//!
//! let typed_data = TypedData::from_json(json_string)?;
//! let pre_image = encode_message(&typed_data)?; // 66 bytes, 0x1901-prefixed
//! let digest = hash_typed_data(&typed_data)?;   // keccak256 of the pre-image
//! ```

pub mod error;
pub mod types;
pub mod encoder;
pub mod hasher;

pub use error::*;
pub use types::*;
pub use encoder::*;
pub use hasher::*;
