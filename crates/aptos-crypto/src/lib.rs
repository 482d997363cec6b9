//! Cryptographic primitives for Aptos transaction signing.
//!
//! This crate provides the signature schemes used when authorizing Aptos
//! transactions: single-key Ed25519 and M-of-N multi-Ed25519, plus the
//! hashing and key-derivation helpers the account layer builds on.
//!
//! # Example
//!
//! ```rust
//! use aptos_crypto::Ed25519PrivateKey;
//!
//! let private_key = Ed25519PrivateKey::generate();
//! let message = b"hello world";
//! let signature = private_key.sign(message);
//!
//! let public_key = private_key.public_key();
//! assert!(public_key.verify(message, &signature).is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

mod ed25519;
mod error;
mod hash;
mod mnemonic;
mod multi_ed25519;

pub use ed25519::{
    Ed25519PrivateKey, Ed25519PublicKey, Ed25519Signature, ED25519_PRIVATE_KEY_LENGTH,
    ED25519_PUBLIC_KEY_LENGTH, ED25519_SIGNATURE_LENGTH,
};
pub use error::{CryptoError, CryptoResult};
pub use hash::{sha3_256, sha3_256_of};
pub use mnemonic::{Mnemonic, APTOS_DERIVATION_PATH};
pub use multi_ed25519::{
    create_bitmap, MultiEd25519PublicKey, MultiEd25519Signature, BITMAP_LENGTH,
    MAX_SIGNATURES_SUPPORTED,
};

/// The authentication key scheme byte for Ed25519 single-key accounts.
pub const ED25519_SCHEME: u8 = 0;

/// The authentication key scheme byte for multi-Ed25519 accounts.
pub const MULTI_ED25519_SCHEME: u8 = 1;

/// Derives an authentication key from public-key material and a scheme byte.
///
/// The authentication key is `SHA3-256(public_key_bytes || scheme_byte)`.
pub fn derive_authentication_key(public_key: &[u8], scheme: u8) -> [u8; 32] {
    sha3_256_of([public_key, &[scheme]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_key_scheme_bytes_disambiguate() {
        let pubkey = [0x11u8; 32];
        let single = derive_authentication_key(&pubkey, ED25519_SCHEME);
        let multi = derive_authentication_key(&pubkey, MULTI_ED25519_SCHEME);
        assert_ne!(single, multi);
    }

    #[test]
    fn authentication_key_is_deterministic() {
        let pubkey = [0x22u8; 32];
        assert_eq!(
            derive_authentication_key(&pubkey, ED25519_SCHEME),
            derive_authentication_key(&pubkey, ED25519_SCHEME),
        );
    }
}
