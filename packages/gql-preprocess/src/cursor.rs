//! Opaque cursors for cursor-based pagination.
//!
//! A cursor is the 1-based ordinal of an item within a stably ordered result set,
//! written as four little-endian bytes and base64 encoded.

use crate::{PreprocessError, PreprocessResult};
use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE},
    Engine as _,
};

const ORDINAL_BYTES: usize = 4;

/// Encode an ordinal into an opaque cursor.
pub fn encode(ordinal: u32) -> String {
    STANDARD.encode(ordinal.to_le_bytes())
}

/// Decode a cursor produced by [`encode`] back into its ordinal.
pub fn decode(cursor: &str) -> PreprocessResult<u32> {
    let bytes = STANDARD
        .decode(cursor)
        .or_else(|_| URL_SAFE.decode(cursor))
        .map_err(|_| PreprocessError::MalformedCursor(cursor.to_string()))?;

    let bytes: [u8; ORDINAL_BYTES] = bytes
        .try_into()
        .map_err(|_| PreprocessError::MalformedCursor(cursor.to_string()))?;

    Ok(u32::from_le_bytes(bytes))
}
