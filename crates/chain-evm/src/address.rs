use sha3::{Digest, Keccak256};

use crate::error::EvmError;

/// Checks the `0x` prefix and 40-hex-digit body shared by every address
/// operation, returning the body on success.
fn hex_body(address: &str) -> Result<&str, EvmError> {
    if !address.starts_with("0x") && !address.starts_with("0X") {
        return Err(EvmError::InvalidAddress("address must start with 0x".into()));
    }

    let body = &address[2..];

    if body.len() != 40 {
        return Err(EvmError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            body.len()
        )));
    }
    if !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(EvmError::InvalidAddress(
            "address contains non-hex characters".into(),
        ));
    }

    Ok(body)
}

/// Validates an Ethereum address string.
///
/// Structural problems (wrong prefix, wrong length, non-hex characters)
/// are errors. A structurally sound address in mixed case is additionally
/// held to its EIP-55 checksum: `Ok(false)` means the casing does not match.
/// Single-case addresses carry no checksum and validate as `Ok(true)`.
pub fn validate_address(address: &str) -> Result<bool, EvmError> {
    let body = hex_body(address)?;

    let is_all_lower = body.chars().all(|c| !c.is_ascii_uppercase());
    let is_all_upper = body.chars().all(|c| !c.is_ascii_lowercase());
    if is_all_lower || is_all_upper {
        return Ok(true);
    }

    let checksummed = checksum_address(&format!("0x{}", body.to_lowercase()))?;
    Ok(checksummed == address)
}

/// Applies EIP-55 mixed-case checksum encoding to an address.
///
/// A hex digit is uppercased when the corresponding nibble of the
/// Keccak-256 hash of the lowercase body is >= 8.
pub fn checksum_address(address: &str) -> Result<String, EvmError> {
    let body = hex_body(address)?.to_lowercase();

    let hash = Keccak256::digest(body.as_bytes());
    let hash_hex = hex::encode(hash);

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");

    for (c, nibble) in body.chars().zip(hash_hex.chars()) {
        if !c.is_ascii_digit() && nibble >= '8' {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }

    Ok(checksummed)
}
