//! Reversible secret obfuscation.
//!
//! The transform is reverse-the-characters then base64. It is
//! intentionally weak and reversible: the console can show a stored
//! secret back to its creator, and the gate is advisory anyway. Do
//! not replace this with a hash without migrating every stored
//! secret.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::GateError;

/// Obfuscate a plaintext secret for storage.
pub fn obfuscate(secret: &str) -> String {
    let reversed: String = secret.chars().rev().collect();
    STANDARD.encode(reversed.as_bytes())
}

/// Recover the plaintext from a stored secret.
pub fn deobfuscate(stored: &str) -> Result<String, GateError> {
    let bytes = STANDARD
        .decode(stored)
        .map_err(|e| GateError::Obfuscation(format!("invalid base64: {e}")))?;
    let reversed = String::from_utf8(bytes)
        .map_err(|e| GateError::Obfuscation(format!("invalid utf-8: {e}")))?;
    Ok(reversed.chars().rev().collect())
}
