use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use sha2::{Sha256, Digest};
use hex;
use tracing::debug;

use crate::permission_error::{PermissionError, Result};
use super::key_pair::KeyPair;
use super::permission::Permission;
use super::types::*;
use super::utils::{parse_address, public_key_to_tron_address, AddressBytes};

/// Represents a Tron transaction that can be signed and broadcast
#[derive(Debug, Clone)]
pub struct TronTransaction {
    pub unsigned_tx: UnsignedTransaction,
}

/// SHA-256 of the raw transaction bytes, which is both the txID and the signed message
fn raw_data_hash(raw_data_hex: &str) -> Result<[u8; 32]> {
    let raw_data = hex::decode(raw_data_hex).map_err(|e| {
        PermissionError::SerializationError(format!("Failed to decode raw_data_hex: {}", e))
    })?;

    let mut hash = [0u8; 32];
    hash.copy_from_slice(&Sha256::digest(&raw_data));
    Ok(hash)
}

fn checked_hash(tx_id: &str, raw_data_hex: &str) -> Result<[u8; 32]> {
    let hash = raw_data_hash(raw_data_hex)?;
    if !hex::encode(hash).eq_ignore_ascii_case(tx_id) {
        return Err(PermissionError::InvalidArgument(format!(
            "txID {} does not match raw_data_hex",
            tx_id
        )));
    }
    Ok(hash)
}

impl TronTransaction {
    pub fn new(unsigned_tx: UnsignedTransaction) -> Self {
        Self { unsigned_tx }
    }

    pub fn tx_id(&self) -> &TxHash {
        &self.unsigned_tx.tx_id
    }

    /// Permission the first contract asks to be authorized by (0 = owner when unset)
    pub fn permission_id(&self) -> i32 {
        self.unsigned_tx
            .raw_data
            .contract
            .first()
            .and_then(|c| c.permission_id)
            .unwrap_or(0)
    }

    /// Sign the transaction with one key
    ///
    /// Further signers of a multi-signed transaction use
    /// [`SignedTransaction::add_signature`] on the result.
    pub fn sign(&self, key_pair: &KeyPair) -> Result<SignedTransaction> {
        let hash = checked_hash(&self.unsigned_tx.tx_id, &self.unsigned_tx.raw_data_hex)?;
        let signature = key_pair.sign_hash(&hash)?;

        debug!(tx_id = %self.unsigned_tx.tx_id, signer = %key_pair.address(), "signed transaction");

        Ok(SignedTransaction {
            tx_id: self.unsigned_tx.tx_id.clone(),
            raw_data: self.unsigned_tx.raw_data.clone(),
            raw_data_hex: self.unsigned_tx.raw_data_hex.clone(),
            signature: vec![hex::encode(signature)],
        })
    }
}

impl SignedTransaction {
    /// Append another signer's signature
    pub fn add_signature(&mut self, key_pair: &KeyPair) -> Result<&mut Self> {
        let hash = checked_hash(&self.tx_id, &self.raw_data_hex)?;
        let signature = hex::encode(key_pair.sign_hash(&hash)?);

        if self.signature.contains(&signature) {
            return Err(PermissionError::InvalidArgument(format!(
                "Transaction already signed by {}",
                key_pair.address()
            )));
        }

        debug!(
            tx_id = %self.tx_id,
            signer = %key_pair.address(),
            signatures = self.signature.len() + 1,
            "added signature"
        );
        self.signature.push(signature);
        Ok(self)
    }

    /// Addresses recovered from every signature, in signing order
    pub fn signer_addresses(&self) -> Result<Vec<AddressBytes>> {
        let hash = checked_hash(&self.tx_id, &self.raw_data_hex)?;

        self.signature
            .iter()
            .map(|signature_hex| {
                let bytes = hex::decode(signature_hex).map_err(|e| {
                    PermissionError::SerializationError(format!("Invalid signature hex: {}", e))
                })?;
                if bytes.len() != 65 {
                    return Err(PermissionError::InvalidKey(format!(
                        "Signature must be 65 bytes, got {}",
                        bytes.len()
                    )));
                }

                let signature = Signature::from_slice(&bytes[..64])
                    .map_err(|e| PermissionError::InvalidKey(format!("Invalid signature: {}", e)))?;
                // Some signers emit v as 27/28
                let v = if bytes[64] >= 27 { bytes[64] - 27 } else { bytes[64] };
                let recovery_id = RecoveryId::from_byte(v).ok_or_else(|| {
                    PermissionError::InvalidKey(format!("Invalid recovery id: {}", v))
                })?;

                let verifying_key =
                    VerifyingKey::recover_from_prehash(&hash, &signature, recovery_id).map_err(
                        |e| PermissionError::InvalidKey(format!("Failed to recover signer: {}", e)),
                    )?;
                let public_key = verifying_key.to_encoded_point(false);
                let address = public_key_to_tron_address(public_key.as_bytes())?;
                parse_address(&address)
            })
            .collect()
    }

    /// Whether the collected signatures reach `permission`'s threshold
    pub fn is_authorized_by(&self, permission: &Permission) -> Result<bool> {
        let signers = self.signer_addresses()?;
        Ok(permission.is_satisfied_by(signers.iter().map(|a| a.as_slice())))
    }
}
