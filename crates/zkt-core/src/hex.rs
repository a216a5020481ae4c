//! Lowercase hex helpers (no external hex crate dependency).

use crate::error::CryptoError;

/// Render bytes as lowercase hex.
pub fn encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// First four bytes as hex, for `Debug` output.
pub fn prefix(bytes: &[u8]) -> String {
    encode(&bytes[..bytes.len().min(4)])
}

/// Decode an even-length hex string.
pub fn decode(hex: &str) -> Result<Vec<u8>, CryptoError> {
    let hex = hex.trim();
    if hex.len() % 2 != 0 {
        return Err(CryptoError::Encoding(
            "hex string must have even length".to_string(),
        ));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| CryptoError::Encoding(format!("invalid hex at position {i}")))
        })
        .collect()
}

/// Decode exactly 32 bytes from a 64-char hex string.
pub fn decode_32(hex: &str) -> Result<[u8; 32], CryptoError> {
    let bytes = decode(hex)?;
    if bytes.len() != 32 {
        return Err(CryptoError::Encoding(format!(
            "expected 64 hex chars, got {}",
            hex.trim().len()
        )));
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Ok(out)
}
