//! ABI word codec
//!
//! Deterministic, bidirectional mapping between typed values and the
//! ledger's 32-byte-word call/return encoding. Selectors are the first
//! four bytes of the keccak-256 hash of the canonical signature string.
//!
//! Every field is read through an explicit fixed-width accessor, so
//! every offset is checked rather than assumed.

use alloy::primitives::{keccak256, Address, B256, Selector, U256};

use crate::error::ClientError;

/// Width of one ABI head word.
pub const WORD: usize = 32;

/// The closed set of argument/return types used by this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    /// 20 bytes, right-aligned in a word.
    Address,
    /// 32-byte big-endian unsigned integer.
    Uint256,
    /// Word-width on the wire, value range 0–255.
    Uint8,
}

impl TypeTag {
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::Address => "address",
            TypeTag::Uint256 => "uint256",
            TypeTag::Uint8 => "uint8",
        }
    }
}

/// A typed argument or decoded return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Address(Address),
    Uint256(U256),
    Uint8(u8),
}

impl Value {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Address(_) => TypeTag::Address,
            Value::Uint256(_) => TypeTag::Uint256,
            Value::Uint8(_) => TypeTag::Uint8,
        }
    }

    /// Unwrap an address, or report which position held the wrong type.
    pub fn as_address(&self) -> Result<Address, ClientError> {
        match self {
            Value::Address(a) => Ok(*a),
            other => Err(ClientError::Decoding(format!(
                "expected address, got {}",
                other.type_tag().name()
            ))),
        }
    }

    pub fn as_uint256(&self) -> Result<U256, ClientError> {
        match self {
            Value::Uint256(v) => Ok(*v),
            other => Err(ClientError::Decoding(format!(
                "expected uint256, got {}",
                other.type_tag().name()
            ))),
        }
    }

    pub fn as_uint8(&self) -> Result<u8, ClientError> {
        match self {
            Value::Uint8(v) => Ok(*v),
            other => Err(ClientError::Decoding(format!(
                "expected uint8, got {}",
                other.type_tag().name()
            ))),
        }
    }
}

/// First four bytes of `keccak256(signature)`.
///
/// Pure and stable: the same signature always yields the same selector.
pub fn selector_of(signature: &str) -> Selector {
    let hash = keccak256(signature.as_bytes());
    Selector::from_slice(&hash[..4])
}

/// Full 32-byte hash of an event signature, compared against `topics[0]`.
pub fn event_signature_hash(signature: &str) -> B256 {
    keccak256(signature.as_bytes())
}

/// Encode `values` against `types` into a head-only ABI blob.
///
/// Fails with `Encoding` on arity mismatch or a value that does not
/// conform to its declared type slot.
pub fn encode(types: &[TypeTag], values: &[Value]) -> Result<Vec<u8>, ClientError> {
    if types.len() != values.len() {
        return Err(ClientError::Encoding(format!(
            "expected {} arguments, got {}",
            types.len(),
            values.len()
        )));
    }

    let mut out = Vec::with_capacity(types.len() * WORD);
    for (i, (tag, value)) in types.iter().zip(values).enumerate() {
        if value.type_tag() != *tag {
            return Err(ClientError::Encoding(format!(
                "argument {} should be {}, got {}",
                i,
                tag.name(),
                value.type_tag().name()
            )));
        }
        out.extend_from_slice(encode_word(value).as_slice());
    }
    Ok(out)
}

fn encode_word(value: &Value) -> B256 {
    match value {
        Value::Address(addr) => addr.into_word(),
        Value::Uint256(v) => B256::from(v.to_be_bytes::<WORD>()),
        Value::Uint8(v) => {
            let mut word = B256::ZERO;
            word[WORD - 1] = *v;
            word
        }
    }
}

/// Decode a blob of head words back into typed values.
///
/// The blob must be at least `types.len()` words long; nodes may append
/// trailing data, which is ignored. Every fixed-width field is sliced at
/// its exact offset and range-checked.
pub fn decode(types: &[TypeTag], blob: &[u8]) -> Result<Vec<Value>, ClientError> {
    let needed = types.len() * WORD;
    if blob.len() < needed {
        return Err(ClientError::Decoding(format!(
            "response too short: {} bytes, need {} for {} field(s)",
            blob.len(),
            needed,
            types.len()
        )));
    }

    let mut values = Vec::with_capacity(types.len());
    for (i, tag) in types.iter().enumerate() {
        let word: &[u8] = &blob[i * WORD..(i + 1) * WORD];
        values.push(decode_word(*tag, word, i)?);
    }
    Ok(values)
}

fn decode_word(tag: TypeTag, word: &[u8], index: usize) -> Result<Value, ClientError> {
    match tag {
        TypeTag::Address => {
            // An address occupies the low 20 bytes; nonzero padding means
            // the field is not actually an address.
            if word[..12].iter().any(|b| *b != 0) {
                return Err(ClientError::Decoding(format!(
                    "field {index}: nonzero padding in address word"
                )));
            }
            Ok(Value::Address(Address::from_slice(&word[12..])))
        }
        TypeTag::Uint256 => Ok(Value::Uint256(U256::from_be_slice(word))),
        TypeTag::Uint8 => {
            if word[..WORD - 1].iter().any(|b| *b != 0) {
                return Err(ClientError::Decoding(format!(
                    "field {index}: uint8 value out of range"
                )));
            }
            Ok(Value::Uint8(word[WORD - 1]))
        }
    }
}

/// Decode a single word of event-log data as an address.
///
/// A log shorter than one word is an explicit decoding failure, never a
/// truncated read.
pub fn decode_log_address(data: &[u8]) -> Result<Address, ClientError> {
    if data.len() < WORD {
        return Err(ClientError::Decoding(format!(
            "log data too short: {} bytes, need {WORD}",
            data.len()
        )));
    }
    decode_word(TypeTag::Address, &data[..WORD], 0)?.as_address()
}

/// Extract the address packed into an indexed event topic.
pub fn topic_address(topic: &B256) -> Result<Address, ClientError> {
    if topic[..12].iter().any(|b| *b != 0) {
        return Err(ClientError::Decoding(
            "nonzero padding in address topic".to_string(),
        ));
    }
    Ok(Address::from_slice(&topic[12..]))
}
