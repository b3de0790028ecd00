/// secp256k1 key pairs for Tron accounts
///
/// A key pair knows its own Tron address, which is what permission keys refer to, and
/// signs 32-byte transaction hashes in the recoverable `r || s || v` form the network
/// expects in `Transaction.signature`.

use k256::ecdsa::SigningKey;

use crate::permission_error::{PermissionError, Result};
use super::utils::{parse_address, public_key_to_tron_address, AddressBytes};

pub struct KeyPair {
    signing_key: SigningKey,
    address: String,
}

impl KeyPair {
    /// Build a key pair from a 32-byte private key
    pub fn from_private_key(private_key: &[u8]) -> Result<Self> {
        let signing_key = SigningKey::from_slice(private_key)
            .map_err(|e| PermissionError::InvalidKey(format!("Invalid private key: {}", e)))?;

        let public_key = signing_key.verifying_key().to_encoded_point(false);
        let address = public_key_to_tron_address(public_key.as_bytes())?;

        Ok(Self { signing_key, address })
    }

    /// Build a key pair from a hex-encoded private key
    pub fn from_hex(private_key_hex: &str) -> Result<Self> {
        let private_key = hex::decode(private_key_hex.trim_start_matches("0x"))
            .map_err(|e| PermissionError::InvalidKey(format!("Invalid private key hex: {}", e)))?;
        Self::from_private_key(&private_key)
    }

    /// Base58Check address of this key
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Raw 21-byte address of this key
    pub fn address_bytes(&self) -> Result<AddressBytes> {
        parse_address(&self.address)
    }

    /// 65-byte uncompressed public key
    pub fn public_key(&self) -> Vec<u8> {
        self.signing_key
            .verifying_key()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec()
    }

    /// Sign a 32-byte hash, returning `r || s || v`
    pub fn sign_hash(&self, hash: &[u8]) -> Result<[u8; 65]> {
        if hash.len() != 32 {
            return Err(PermissionError::InvalidKey(
                "Message hash must be 32 bytes".to_string(),
            ));
        }

        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(hash)
            .map_err(|e| PermissionError::InvalidKey(format!("Failed to sign: {}", e)))?;

        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&signature.to_bytes());
        out[64] = recovery_id.to_byte();
        Ok(out)
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair").field("address", &self.address).finish_non_exhaustive()
    }
}
