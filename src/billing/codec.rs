//! Conversion between UUID text and the `BINARY(16)` primary key form.
//!
//! Bills are keyed by a UUID stored as 16 raw bytes. On the way in, the
//! hyphenated text is stripped of hyphens and the 32 hex digits are decoded.
//! On the way out, the store hands back `HEX(id)` (32 upper-case digits),
//! which is turned back into lower-case hyphenated text.
//!
//! ```text
//! 550E8400-e29b-41d4-A716-446655440000  --encode-->  [0x55, 0x0e, .., 0x00]
//! 550E8400E29B41D4A716446655440000      --decode-->  550e8400-e29b-41d4-a716-446655440000
//! ```

use uuid::Uuid;

use crate::error::IdentifierError;

/// Size of a stored identifier in bytes.
pub const ID_BYTES: usize = 16;

/// Length of the stored identifier rendered as hex.
pub const HEX_LEN: usize = ID_BYTES * 2;

/// Length of hyphenated UUID text.
const TEXT_LEN: usize = HEX_LEN + 4;

/// Hyphen offsets within 8-4-4-4-12 text.
const HYPHENS: [usize; 4] = [8, 13, 18, 23];

/// Encode hyphenated UUID text into its 16-byte storage form.
///
/// Accepts upper- or lower-case hex digits.
pub fn encode(text: &str) -> Result<[u8; ID_BYTES], IdentifierError> {
    let malformed = || IdentifierError::MalformedUuid(text.to_string());

    if text.len() != TEXT_LEN {
        return Err(malformed());
    }

    let raw = text.as_bytes();
    let mut digits = String::with_capacity(HEX_LEN);
    for (i, &c) in raw.iter().enumerate() {
        if HYPHENS.contains(&i) {
            if c != b'-' {
                return Err(malformed());
            }
        } else {
            digits.push(c as char);
        }
    }

    let mut bytes = [0u8; ID_BYTES];
    hex::decode_to_slice(&digits, &mut bytes).map_err(|_| malformed())?;
    Ok(bytes)
}

/// Decode the store's 32-digit hex rendering into canonical UUID text.
pub fn decode(hex_text: &str) -> Result<String, IdentifierError> {
    decode_uuid(hex_text).map(|uuid| uuid.hyphenated().to_string())
}

/// Decode the store's 32-digit hex rendering into a [`Uuid`].
pub fn decode_uuid(hex_text: &str) -> Result<Uuid, IdentifierError> {
    if hex_text.len() != HEX_LEN {
        return Err(IdentifierError::MalformedHex(hex_text.to_string()));
    }

    let mut bytes = [0u8; ID_BYTES];
    hex::decode_to_slice(hex_text, &mut bytes)
        .map_err(|_| IdentifierError::MalformedHex(hex_text.to_string()))?;
    Ok(Uuid::from_bytes(bytes))
}

/// Render stored bytes the way MySQL's `HEX()` does (upper-case).
pub fn to_hex(bytes: &[u8; ID_BYTES]) -> String {
    hex::encode_upper(bytes)
}
