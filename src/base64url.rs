//! URL-safe base64 without padding.
//!
//! Encoding never emits `=`. Decoding accepts input with or without the
//! trailing padding; a length of `len % 4 == 1` can never be valid.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode bytes as unpadded base64url
pub fn encode(data: &[u8]) -> String {
    ENGINE.encode(data)
}

/// Decode base64url, tolerating missing padding
pub fn decode(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    ENGINE.decode(text)
}
