// [libs/domain/models/src/ids.rs]
//! Canonical base32-no-pad transport encoding for brigade identifiers.
//!
//! The pair-agent CLI and the pair-agent JSON responses both carry brigade
//! ids as lowercase, unpadded base32 rather than the usual hyphenated UUID
//! text form.

use data_encoding::{Encoding, Specification};
use once_cell::sync::Lazy;
use thiserror::Error;
use uuid::Uuid;

static BASE32_LOWER_NOPAD: Lazy<Encoding> = Lazy::new(|| {
    let mut spec = Specification::new();
    spec.symbols.push_str("abcdefghijklmnopqrstuvwxyz234567");
    spec.encoding().expect("static base32 spec is valid")
});

#[derive(Debug, Error)]
pub enum IdEncodingError {
    #[error("invalid base32 brigade id: {0}")]
    InvalidBase32(String),
    #[error("decoded brigade id is not 16 bytes")]
    WrongLength,
}

pub fn encode_brigade_id(id: Uuid) -> String {
    BASE32_LOWER_NOPAD.encode(id.as_bytes())
}

pub fn decode_brigade_id(encoded: &str) -> Result<Uuid, IdEncodingError> {
    let bytes = BASE32_LOWER_NOPAD
        .decode(encoded.to_lowercase().as_bytes())
        .map_err(|e| IdEncodingError::InvalidBase32(e.to_string()))?;
    Uuid::from_slice(&bytes).map_err(|_| IdEncodingError::WrongLength)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let id = Uuid::new_v4();
        let encoded = encode_brigade_id(id);
        assert!(!encoded.contains('='));
        assert_eq!(decode_brigade_id(&encoded).unwrap(), id);
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode_brigade_id("not-base32!!").is_err());
    }
}
