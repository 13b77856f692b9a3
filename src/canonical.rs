// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Canonical record encoding.
//!
//! ```text
//! magic "defs1"      5 bytes
//! data type          u8   (0 network, 1 token, 2 solana token)
//! timestamp          u32 LE
//! body length        u16 LE
//! body               bincode-2 standard() encoding of the payload struct
//! ```
//!
//! bincode's standard configuration writes fields in declaration order with
//! minimal varints and length-prefixed UTF-8, so one logical record has
//! exactly one byte form.

use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DefinitionError, Result};
use crate::types::record::{
    DefinitionPayload, DefinitionRecord, NetworkInfo, SolanaTokenInfo, TokenInfo, DATA_TYPE_NETWORK,
    DATA_TYPE_SOLANA_TOKEN, DATA_TYPE_TOKEN,
};

pub const FORMAT_MAGIC: [u8; 5] = *b"defs1";
pub const HEADER_LEN: usize = FORMAT_MAGIC.len() + 1 + 4 + 2;

pub const MAX_SYMBOL_LEN: usize = 32;
pub const MAX_NAME_LEN: usize = 256;

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

fn malformed(record: &DefinitionRecord, reason: impl Into<String>) -> DefinitionError {
    DefinitionError::MalformedRecord {
        identity: record.identity_key().to_string(),
        reason: reason.into(),
    }
}

/// Shape checks applied before a record is hashed.
pub fn validate(record: &DefinitionRecord) -> Result<()> {
    let symbol = record.symbol();
    if symbol.trim().is_empty() {
        return Err(malformed(record, "symbol is empty"));
    }
    if symbol.len() > MAX_SYMBOL_LEN {
        return Err(malformed(record, format!("symbol longer than {MAX_SYMBOL_LEN} bytes")));
    }

    let name = record.name();
    if name.trim().is_empty() {
        return Err(malformed(record, "name is empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(malformed(record, format!("name longer than {MAX_NAME_LEN} bytes")));
    }

    match record.payload() {
        DefinitionPayload::EthereumNetwork(n) if n.chain_id == 0 => {
            Err(malformed(record, "chain_id must be non-zero"))
        }
        DefinitionPayload::EthereumToken(t) if t.chain_id == 0 => {
            Err(malformed(record, "chain_id must be non-zero"))
        }
        DefinitionPayload::SolanaToken(s) => {
            if !(32..=44).contains(&s.mint.len()) {
                return Err(malformed(record, "mint must be 32 to 44 base58 characters"));
            }
            if let Some(c) = s.mint.chars().find(|c| !BASE58_ALPHABET.contains(*c)) {
                return Err(malformed(record, format!("mint contains non-base58 character {c:?}")));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn encode_body<T: Serialize>(record: &DefinitionRecord, info: &T) -> Result<Vec<u8>> {
    bincode::serde::encode_to_vec(info, bincode::config::standard())
        .map_err(|e| malformed(record, format!("body encoding failed: {e}")))
}

/// Serializes `record` into its canonical byte form for a signing cycle
/// stamped with `timestamp`.
pub fn canonicalize(record: &DefinitionRecord, timestamp: u32) -> Result<Vec<u8>> {
    validate(record)?;

    let body = match record.payload() {
        DefinitionPayload::EthereumNetwork(n) => encode_body(record, n)?,
        DefinitionPayload::EthereumToken(t) => encode_body(record, t)?,
        DefinitionPayload::SolanaToken(s) => encode_body(record, s)?,
    };
    let body_len = u16::try_from(body.len())
        .map_err(|_| malformed(record, format!("body of {} bytes exceeds u16 length", body.len())))?;

    let mut buf = Vec::with_capacity(HEADER_LEN + body.len());
    buf.extend_from_slice(&FORMAT_MAGIC);
    buf.push(record.data_type());
    buf.extend_from_slice(&timestamp.to_le_bytes());
    buf.extend_from_slice(&body_len.to_le_bytes());
    buf.extend_from_slice(&body);
    Ok(buf)
}

fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let (value, used) = bincode::serde::decode_from_slice::<T, _>(body, bincode::config::standard())
        .map_err(|e| DefinitionError::InvalidBlob(format!("body decoding failed: {e}")))?;
    if used != body.len() {
        return Err(DefinitionError::InvalidBlob(format!(
            "body has {} trailing bytes",
            body.len() - used
        )));
    }
    Ok(value)
}

/// Canonical record read back from the front of a byte slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    pub record: DefinitionRecord,
    pub timestamp: u32,
    /// Number of bytes of the input that formed the canonical encoding.
    pub consumed: usize,
}

/// Parses a canonical encoding from the start of `data`; bytes after the
/// body are left for the caller.
pub fn decode_canonical(data: &[u8]) -> Result<DecodedRecord> {
    let truncated = |e: std::io::Error| DefinitionError::InvalidBlob(format!("truncated header: {e}"));
    let mut cursor = Cursor::new(data);

    let mut magic = [0u8; FORMAT_MAGIC.len()];
    cursor.read_exact(&mut magic).map_err(truncated)?;
    if magic != FORMAT_MAGIC {
        return Err(DefinitionError::InvalidBlob("bad format magic".to_string()));
    }
    let data_type = cursor.read_u8().map_err(truncated)?;
    let timestamp = cursor.read_u32::<LittleEndian>().map_err(truncated)?;
    let body_len = cursor.read_u16::<LittleEndian>().map_err(truncated)? as usize;

    let end = HEADER_LEN + body_len;
    if data.len() < end {
        return Err(DefinitionError::InvalidBlob(format!(
            "body needs {body_len} bytes, {} available",
            data.len() - HEADER_LEN
        )));
    }
    let body = &data[HEADER_LEN..end];

    let payload = match data_type {
        DATA_TYPE_NETWORK => DefinitionPayload::EthereumNetwork(decode_body::<NetworkInfo>(body)?),
        DATA_TYPE_TOKEN => DefinitionPayload::EthereumToken(decode_body::<TokenInfo>(body)?),
        DATA_TYPE_SOLANA_TOKEN => DefinitionPayload::SolanaToken(decode_body::<SolanaTokenInfo>(body)?),
        other => return Err(DefinitionError::InvalidBlob(format!("unknown data type {other}"))),
    };

    Ok(DecodedRecord {
        record: DefinitionRecord::new(payload),
        timestamp,
        consumed: end,
    })
}
