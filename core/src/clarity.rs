/// Clarity contract-call arguments and their consensus wire encoding.
use serde::Serialize;

use crate::error::{Result, TipError};

const TYPE_PREFIX_UINT: u8 = 0x01;
const TYPE_PREFIX_STRING_ASCII: u8 = 0x0d;

/// A typed Clarity value as passed to a contract function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum ClarityValue {
    Uint(u128),
    StringAscii(String),
}

impl ClarityValue {
    /// Build a `string-ascii` value. Non-ASCII input is rejected since the
    /// contract type cannot represent it.
    pub fn string_ascii(value: &str) -> Result<Self> {
        if !value.is_ascii() {
            return Err(TipError::InvalidRecipient(format!(
                "'{value}' contains non-ASCII characters"
            )));
        }
        Ok(ClarityValue::StringAscii(value.to_string()))
    }

    pub fn uint(value: impl Into<u128>) -> Self {
        ClarityValue::Uint(value.into())
    }

    /// Consensus serialization: a one-byte type prefix followed by the payload.
    pub fn serialize(&self) -> Vec<u8> {
        match self {
            ClarityValue::Uint(n) => {
                let mut out = Vec::with_capacity(17);
                out.push(TYPE_PREFIX_UINT);
                out.extend_from_slice(&n.to_be_bytes());
                out
            }
            ClarityValue::StringAscii(s) => {
                let bytes = s.as_bytes();
                let mut out = Vec::with_capacity(5 + bytes.len());
                out.push(TYPE_PREFIX_STRING_ASCII);
                out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
                out.extend_from_slice(bytes);
                out
            }
        }
    }

    /// `0x`-prefixed hex of the consensus serialization.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.serialize()))
    }
}

impl std::fmt::Display for ClarityValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClarityValue::Uint(n) => write!(f, "u{n}"),
            ClarityValue::StringAscii(s) => write!(f, "\"{s}\""),
        }
    }
}
