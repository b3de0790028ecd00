use bs58;
use sha2::{Sha256, Digest};
use sha3::Keccak256;
use hex;

use crate::permission_error::{PermissionError, Result};

/// Raw address length: 1 byte prefix (0x41) + 20 bytes
pub const ADDRESS_LEN: usize = 21;

/// Prefix byte of every mainnet/testnet Tron address
pub const ADDRESS_PREFIX: u8 = 0x41;

/// Raw 21-byte address
pub type AddressBytes = [u8; ADDRESS_LEN];

/// First four bytes of a double SHA-256
fn checksum(payload: &[u8]) -> [u8; 4] {
    let hash1 = Sha256::digest(payload);
    let hash2 = Sha256::digest(hash1);

    let mut checksum = [0u8; 4];
    checksum.copy_from_slice(&hash2[..4]);
    checksum
}

/// Validate a Tron address (Base58Check format, starts with 'T')
pub fn validate_tron_address(address: &str) -> Result<()> {
    decode_base58_address(address).map(|_| ())
}

fn decode_base58_address(address: &str) -> Result<AddressBytes> {
    if !address.starts_with('T') {
        return Err(PermissionError::InvalidAddress(
            "Tron address must start with 'T'".to_string()
        ));
    }

    // Tron addresses are 34 characters in Base58
    if address.len() != 34 {
        return Err(PermissionError::InvalidAddress(
            format!("Invalid Tron address length: {} (expected 34)", address.len())
        ));
    }

    let decoded = bs58::decode(address)
        .into_vec()
        .map_err(|_| PermissionError::InvalidAddress("Invalid Base58 encoding".to_string()))?;

    // 21 address bytes + 4 bytes checksum
    if decoded.len() != ADDRESS_LEN + 4 {
        return Err(PermissionError::InvalidAddress(
            format!("Invalid decoded length: {} (expected 25)", decoded.len())
        ));
    }

    let (address_bytes, expected) = decoded.split_at(ADDRESS_LEN);
    if checksum(address_bytes) != expected {
        return Err(PermissionError::InvalidAddress("Invalid checksum".to_string()));
    }
    if address_bytes[0] != ADDRESS_PREFIX {
        return Err(PermissionError::InvalidAddress(
            format!("Invalid address prefix: 0x{:02x}", address_bytes[0])
        ));
    }

    let mut out = [0u8; ADDRESS_LEN];
    out.copy_from_slice(address_bytes);
    Ok(out)
}

fn decode_hex_address(hex_str: &str) -> Result<AddressBytes> {
    let hex_str = hex_str.trim_start_matches("0x");
    let address_bytes = hex::decode(hex_str)
        .map_err(|_| PermissionError::InvalidAddress("Invalid hex encoding".to_string()))?;

    if address_bytes.len() != ADDRESS_LEN {
        return Err(PermissionError::InvalidAddress(
            format!("Invalid hex address length: {} (expected 21)", address_bytes.len())
        ));
    }
    if address_bytes[0] != ADDRESS_PREFIX {
        return Err(PermissionError::InvalidAddress(
            format!("Invalid address prefix: 0x{:02x}", address_bytes[0])
        ));
    }

    let mut out = [0u8; ADDRESS_LEN];
    out.copy_from_slice(&address_bytes);
    Ok(out)
}

/// Parse a human-readable address into its raw 21 bytes
///
/// Accepts Base58Check (`T...`) and hex (`41...`, with or without `0x`).
pub fn parse_address(address: &str) -> Result<AddressBytes> {
    match address.len() {
        34 => decode_base58_address(address),
        42 | 44 => decode_hex_address(address),
        _ => Err(PermissionError::InvalidAddress(format!(
            "Unsupported address format: {:?}",
            address
        ))),
    }
}

/// Convert Tron Base58 address to hex format
pub fn base58_to_hex(address: &str) -> Result<String> {
    Ok(hex::encode(decode_base58_address(address)?))
}

/// Convert hex address to Tron Base58 format
pub fn hex_to_base58(hex_str: &str) -> Result<String> {
    Ok(bytes_to_base58(&decode_hex_address(hex_str)?))
}

/// Base58Check-encode raw address bytes
pub fn bytes_to_base58(address_bytes: &[u8]) -> String {
    let mut full_address = address_bytes.to_vec();
    full_address.extend_from_slice(&checksum(address_bytes));
    bs58::encode(&full_address).into_string()
}

/// Derive the Base58 Tron address of a secp256k1 public key
///
/// Takes the 65-byte uncompressed SEC1 encoding (0x04 || X || Y).
pub fn public_key_to_tron_address(public_key: &[u8]) -> Result<String> {
    if public_key.len() != 65 || public_key[0] != 0x04 {
        return Err(PermissionError::InvalidKey(format!(
            "Expected 65-byte uncompressed public key, got {} bytes",
            public_key.len()
        )));
    }

    let hash = Keccak256::digest(&public_key[1..]);

    let mut address_bytes = [0u8; ADDRESS_LEN];
    address_bytes[0] = ADDRESS_PREFIX;
    address_bytes[1..].copy_from_slice(&hash[12..]);

    Ok(bytes_to_base58(&address_bytes))
}
