//! Multi-Ed25519 signature scheme.
//!
//! Multi-Ed25519 enables M-of-N threshold accounts where M signatures out
//! of N public keys are required to authorize a transaction. The wire form
//! is canonical: signatures are ordered by ascending signer index and a
//! 4-byte bitmap records which indices contributed, MSB-first within each
//! byte.

use crate::ed25519::{
    Ed25519PublicKey, Ed25519Signature, ED25519_PUBLIC_KEY_LENGTH, ED25519_SIGNATURE_LENGTH,
};
use crate::error::{CryptoError, CryptoResult};
use std::fmt;

/// Maximum number of keys (and signer slots) in a multi-Ed25519 account.
pub const MAX_SIGNATURES_SUPPORTED: usize = 32;

/// Length of the signer bitmap in bytes.
pub const BITMAP_LENGTH: usize = 4;

/// Builds the 4-byte signer bitmap from bit positions.
///
/// A position starts at index 0 and must be below 32. Bits are set
/// MSB-first within each byte, so `[0, 2, 31]` yields
/// `0b10100000_00000000_00000000_00000001`.
///
/// # Errors
///
/// Fails with [`CryptoError::IndexOutOfRange`] for a position of 32 or
/// more, and [`CryptoError::DuplicateBit`] if the same position appears
/// twice.
pub fn create_bitmap(bits: &[u8]) -> CryptoResult<[u8; BITMAP_LENGTH]> {
    const FIRST_BIT_IN_BYTE: u8 = 0b1000_0000;
    let mut bitmap = [0u8; BITMAP_LENGTH];

    for &bit in bits {
        if bit as usize >= MAX_SIGNATURES_SUPPORTED {
            return Err(CryptoError::IndexOutOfRange(bit));
        }
        let byte_offset = (bit / 8) as usize;
        let mask = FIRST_BIT_IN_BYTE >> (bit % 8);
        if bitmap[byte_offset] & mask != 0 {
            return Err(CryptoError::DuplicateBit(bit));
        }
        bitmap[byte_offset] |= mask;
    }
    Ok(bitmap)
}

/// A multi-Ed25519 public key: an ordered list of Ed25519 public keys plus
/// the signing threshold (M in M-of-N).
///
/// # Example
///
/// ```rust
/// use aptos_crypto::{Ed25519PrivateKey, MultiEd25519PublicKey};
///
/// let keys: Vec<_> = (0..3).map(|_| Ed25519PrivateKey::generate().public_key()).collect();
/// let multi_pk = MultiEd25519PublicKey::new(keys, 2).unwrap(); // 2-of-3
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct MultiEd25519PublicKey {
    public_keys: Vec<Ed25519PublicKey>,
    threshold: u8,
}

impl MultiEd25519PublicKey {
    /// Creates a new multi-Ed25519 public key.
    ///
    /// # Errors
    ///
    /// Fails with [`CryptoError::InvalidThreshold`] if the threshold
    /// exceeds the number of keys or the 32-key scheme maximum.
    pub fn new(public_keys: Vec<Ed25519PublicKey>, threshold: u8) -> CryptoResult<Self> {
        if threshold as usize > MAX_SIGNATURES_SUPPORTED {
            return Err(CryptoError::InvalidThreshold(format!(
                "threshold {} cannot be larger than {}",
                threshold, MAX_SIGNATURES_SUPPORTED
            )));
        }
        if threshold as usize > public_keys.len() {
            return Err(CryptoError::InvalidThreshold(format!(
                "threshold {} cannot be larger than the public key count {}",
                threshold,
                public_keys.len()
            )));
        }
        Ok(Self {
            public_keys,
            threshold,
        })
    }

    /// Returns the number of public keys.
    pub fn num_keys(&self) -> usize {
        self.public_keys.len()
    }

    /// Returns the threshold (M in M-of-N).
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Returns the individual public keys.
    pub fn public_keys(&self) -> &[Ed25519PublicKey] {
        &self.public_keys
    }

    /// Serializes to the canonical byte layout:
    /// `key_1 || key_2 || ... || key_n || threshold`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.public_keys.len() * ED25519_PUBLIC_KEY_LENGTH + 1);
        for pk in &self.public_keys {
            bytes.extend_from_slice(pk.as_bytes());
        }
        bytes.push(self.threshold);
        bytes
    }

    /// Parses the canonical byte layout back into a public key.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() < ED25519_PUBLIC_KEY_LENGTH + 1 {
            return Err(CryptoError::InvalidPublicKey(format!(
                "multi-Ed25519 public key too short: {} bytes",
                bytes.len()
            )));
        }

        let threshold = bytes[bytes.len() - 1];
        let key_bytes = &bytes[..bytes.len() - 1];
        if key_bytes.len() % ED25519_PUBLIC_KEY_LENGTH != 0 {
            return Err(CryptoError::InvalidPublicKey(format!(
                "key bytes length {} is not a multiple of {}",
                key_bytes.len(),
                ED25519_PUBLIC_KEY_LENGTH
            )));
        }

        let public_keys = key_bytes
            .chunks_exact(ED25519_PUBLIC_KEY_LENGTH)
            .map(Ed25519PublicKey::from_bytes)
            .collect::<CryptoResult<Vec<_>>>()?;

        Self::new(public_keys, threshold)
    }

    /// Derives the authentication key for this public key.
    ///
    /// Uses the multi-Ed25519 scheme byte (0x01), which disambiguates
    /// multi-key accounts from single-key accounts.
    pub fn authentication_key(&self) -> [u8; 32] {
        crate::derive_authentication_key(&self.to_bytes(), crate::MULTI_ED25519_SCHEME)
    }

    /// Verifies a multi-Ed25519 signature against a message.
    ///
    /// Checks every contributed signature against the key at its bit
    /// index. Threshold satisfaction is ultimately enforced on-chain.
    pub fn verify(&self, message: &[u8], signature: &MultiEd25519Signature) -> CryptoResult<()> {
        if signature.num_signatures() < self.threshold as usize {
            return Err(CryptoError::SignatureVerificationFailed);
        }
        for (index, sig) in signature.signatures() {
            let pk = self
                .public_keys
                .get(*index as usize)
                .ok_or(CryptoError::IndexOutOfRange(*index))?;
            pk.verify(message, sig)?;
        }
        Ok(())
    }
}

impl fmt::Debug for MultiEd25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MultiEd25519PublicKey({}-of-{} keys)",
            self.threshold,
            self.public_keys.len()
        )
    }
}

impl fmt::Display for MultiEd25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}

/// A multi-Ed25519 signature: contributed signatures plus the 4-byte
/// signer bitmap.
///
/// Construction accepts (bit index, signature) pairs in any order and
/// canonicalizes to ascending bit index, so the bytes produced are
/// independent of signing order.
#[derive(Clone, PartialEq, Eq)]
pub struct MultiEd25519Signature {
    signatures: Vec<(u8, Ed25519Signature)>,
    bitmap: [u8; BITMAP_LENGTH],
}

impl MultiEd25519Signature {
    /// Creates a new multi-Ed25519 signature from (bit index, signature)
    /// pairs.
    ///
    /// # Errors
    ///
    /// Fails with [`CryptoError::IndexOutOfRange`] for an index of 32 or
    /// more, and [`CryptoError::DuplicateBit`] on a repeated index.
    pub fn new(mut signatures: Vec<(u8, Ed25519Signature)>) -> CryptoResult<Self> {
        // Index and signature travel together through the sort so the
        // wire order stays aligned with the bitmap.
        signatures.sort_by_key(|(index, _)| *index);
        let bits: Vec<u8> = signatures.iter().map(|(index, _)| *index).collect();
        let bitmap = create_bitmap(&bits)?;
        Ok(Self { signatures, bitmap })
    }

    /// Serializes to the canonical byte layout:
    /// `signature_1 || ... || signature_m || bitmap`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes =
            Vec::with_capacity(self.signatures.len() * ED25519_SIGNATURE_LENGTH + BITMAP_LENGTH);
        for (_, sig) in &self.signatures {
            bytes.extend_from_slice(sig.as_bytes());
        }
        bytes.extend_from_slice(&self.bitmap);
        bytes
    }

    /// Parses the canonical byte layout back into a signature.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() < BITMAP_LENGTH {
            return Err(CryptoError::InvalidSignature(
                "multi-Ed25519 signature too short".into(),
            ));
        }

        let bitmap_start = bytes.len() - BITMAP_LENGTH;
        let mut bitmap = [0u8; BITMAP_LENGTH];
        bitmap.copy_from_slice(&bytes[bitmap_start..]);

        let sig_bytes = &bytes[..bitmap_start];
        let num_sigs = bitmap.iter().map(|b| b.count_ones()).sum::<u32>() as usize;
        if sig_bytes.len() != num_sigs * ED25519_SIGNATURE_LENGTH {
            return Err(CryptoError::InvalidSignature(format!(
                "signature bytes length {} does not match {} bitmap bits",
                sig_bytes.len(),
                num_sigs
            )));
        }

        let mut signatures = Vec::with_capacity(num_sigs);
        let mut sig_idx = 0;
        for bit_pos in 0..MAX_SIGNATURES_SUPPORTED as u8 {
            let byte_offset = (bit_pos / 8) as usize;
            let mask = 0b1000_0000u8 >> (bit_pos % 8);
            if bitmap[byte_offset] & mask != 0 {
                let start = sig_idx * ED25519_SIGNATURE_LENGTH;
                let sig =
                    Ed25519Signature::from_bytes(&sig_bytes[start..start + ED25519_SIGNATURE_LENGTH])?;
                signatures.push((bit_pos, sig));
                sig_idx += 1;
            }
        }

        Ok(Self { signatures, bitmap })
    }

    /// Returns the number of contributed signatures.
    pub fn num_signatures(&self) -> usize {
        self.signatures.len()
    }

    /// Returns the signatures with their bit indices, ascending.
    pub fn signatures(&self) -> &[(u8, Ed25519Signature)] {
        &self.signatures
    }

    /// Returns the signer bitmap.
    pub fn bitmap(&self) -> &[u8; BITMAP_LENGTH] {
        &self.bitmap
    }

    /// Checks whether a particular bit index contributed.
    pub fn has_signature(&self, index: u8) -> bool {
        if index as usize >= MAX_SIGNATURES_SUPPORTED {
            return false;
        }
        self.bitmap[(index / 8) as usize] & (0b1000_0000 >> (index % 8)) != 0
    }
}

impl fmt::Debug for MultiEd25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MultiEd25519Signature({} signatures, bitmap={:02x?})",
            self.signatures.len(),
            self.bitmap
        )
    }
}

impl fmt::Display for MultiEd25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ed25519::Ed25519PrivateKey;

    #[test]
    fn test_create_bitmap() {
        let bitmap = create_bitmap(&[0, 2, 31]).unwrap();
        assert_eq!(bitmap, [0b1010_0000, 0, 0, 0b0000_0001]);
    }

    #[test]
    fn test_create_bitmap_duplicate_fails() {
        let err = create_bitmap(&[1, 1]).unwrap_err();
        assert!(matches!(err, CryptoError::DuplicateBit(1)));
    }

    #[test]
    fn test_create_bitmap_out_of_range_fails() {
        let err = create_bitmap(&[32]).unwrap_err();
        assert!(matches!(err, CryptoError::IndexOutOfRange(32)));
    }

    #[test]
    fn test_public_key_threshold_validation() {
        let keys: Vec<_> = (0..3)
            .map(|_| Ed25519PrivateKey::generate().public_key())
            .collect();

        assert!(MultiEd25519PublicKey::new(keys.clone(), 2).is_ok());
        assert!(MultiEd25519PublicKey::new(keys.clone(), 3).is_ok());
        // threshold > key count
        assert!(MultiEd25519PublicKey::new(keys.clone(), 4).is_err());
        // threshold > scheme maximum
        assert!(MultiEd25519PublicKey::new(keys, 33).is_err());
    }

    #[test]
    fn test_public_key_bytes_roundtrip() {
        let keys: Vec<_> = (0..3)
            .map(|_| Ed25519PrivateKey::generate().public_key())
            .collect();
        let multi_pk = MultiEd25519PublicKey::new(keys, 2).unwrap();

        let bytes = multi_pk.to_bytes();
        assert_eq!(bytes.len(), 3 * 32 + 1);
        let restored = MultiEd25519PublicKey::from_bytes(&bytes).unwrap();
        assert_eq!(multi_pk, restored);
    }

    #[test]
    fn test_authentication_key_uses_multisig_scheme() {
        let keys: Vec<_> = (0..2)
            .map(|_| Ed25519PrivateKey::generate().public_key())
            .collect();
        let multi_pk = MultiEd25519PublicKey::new(keys, 1).unwrap();

        let expected =
            crate::sha3_256_of([multi_pk.to_bytes().as_slice(), &[crate::MULTI_ED25519_SCHEME]]);
        assert_eq!(multi_pk.authentication_key(), expected);
    }

    #[test]
    fn test_signature_order_independence() {
        let private_keys: Vec<_> = (0..3).map(|_| Ed25519PrivateKey::generate()).collect();
        let message = b"order independent";

        let sig0 = private_keys[0].sign(message);
        let sig2 = private_keys[2].sign(message);

        let forward = MultiEd25519Signature::new(vec![(0, sig0), (2, sig2)]).unwrap();
        let reversed = MultiEd25519Signature::new(vec![(2, sig2), (0, sig0)]).unwrap();
        assert_eq!(forward.to_bytes(), reversed.to_bytes());
    }

    #[test]
    fn test_sign_verify_2_of_3() {
        let private_keys: Vec<_> = (0..3).map(|_| Ed25519PrivateKey::generate()).collect();
        let public_keys: Vec<_> = private_keys.iter().map(|k| k.public_key()).collect();
        let multi_pk = MultiEd25519PublicKey::new(public_keys, 2).unwrap();

        let message = b"test message";
        let multi_sig = MultiEd25519Signature::new(vec![
            (0, private_keys[0].sign(message)),
            (2, private_keys[2].sign(message)),
        ])
        .unwrap();

        assert!(multi_pk.verify(message, &multi_sig).is_ok());
        assert!(multi_pk.verify(b"wrong message", &multi_sig).is_err());
    }

    #[test]
    fn test_signature_bytes_roundtrip() {
        let private_keys: Vec<_> = (0..5).map(|_| Ed25519PrivateKey::generate()).collect();
        let message = b"roundtrip";

        let multi_sig = MultiEd25519Signature::new(
            [1u8, 3, 4]
                .iter()
                .map(|&i| (i, private_keys[i as usize].sign(message)))
                .collect(),
        )
        .unwrap();

        let bytes = multi_sig.to_bytes();
        let restored = MultiEd25519Signature::from_bytes(&bytes).unwrap();
        assert_eq!(multi_sig, restored);
        assert!(restored.has_signature(1));
        assert!(!restored.has_signature(0));
        assert!(!restored.has_signature(2));
    }

    #[test]
    fn test_duplicate_signer_index_fails() {
        let key = Ed25519PrivateKey::generate();
        let sig = key.sign(b"dup");
        assert!(MultiEd25519Signature::new(vec![(5, sig), (5, sig)]).is_err());
    }
}
