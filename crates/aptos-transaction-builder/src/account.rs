//! Local signing accounts.
//!
//! A [`LocalAccount`] owns an Ed25519 keypair plus the derived
//! authentication key that doubles as the account address. Accounts are
//! built from a raw 32-byte seed or from a BIP-39 mnemonic via the fixed
//! Aptos derivation path `m/44'/637'/0'/0'/0'`.

use crate::error::AptosResult;
use crate::types::AccountAddress;
use aptos_crypto::{
    derive_authentication_key, sha3_256, Ed25519PrivateKey, Ed25519PublicKey, Ed25519Signature,
    Mnemonic, ED25519_SCHEME,
};
use std::fmt;

/// An Ed25519 account that can sign transactions.
///
/// # Example
///
/// ```rust
/// use aptos_transaction_builder::account::LocalAccount;
///
/// let account = LocalAccount::from_seed([7u8; 32]);
/// let signature = account.sign(b"message", "APTOS::RawTransaction");
/// ```
#[derive(Clone)]
pub struct LocalAccount {
    private_key: Ed25519PrivateKey,
    public_key: Ed25519PublicKey,
    auth_key: [u8; 32],
}

impl LocalAccount {
    /// Creates an account from a 32-byte seed.
    ///
    /// The authentication key is `SHA3-256(public_key || 0x00)` (the
    /// single-key Ed25519 scheme byte).
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let private_key =
            Ed25519PrivateKey::from_bytes(&seed).expect("seed is exactly 32 bytes");
        Self::from_private_key(private_key)
    }

    /// Creates an account from an existing private key.
    pub fn from_private_key(private_key: Ed25519PrivateKey) -> Self {
        let public_key = private_key.public_key();
        let auth_key = derive_authentication_key(&public_key.to_bytes(), ED25519_SCHEME);
        Self {
            private_key,
            public_key,
            auth_key,
        }
    }

    /// Creates an account from a BIP-39 mnemonic phrase.
    ///
    /// Derives the key along the fixed Aptos path `m/44'/637'/0'/0'/0'`.
    ///
    /// # Errors
    ///
    /// Fails on an invalid mnemonic phrase or a derivation error.
    pub fn from_mnemonic(phrase: &str) -> AptosResult<Self> {
        Self::from_mnemonic_with_index(phrase, 0)
    }

    /// Creates an account from a mnemonic with an explicit address index
    /// (`m/44'/637'/0'/0'/index'`).
    pub fn from_mnemonic_with_index(phrase: &str, index: u32) -> AptosResult<Self> {
        let mnemonic = Mnemonic::from_phrase(phrase)?;
        let private_key = mnemonic.derive_ed25519_key(index)?;
        Ok(Self::from_private_key(private_key))
    }

    /// Returns the first 32 bytes of the raw BIP-39 seed.
    ///
    /// Early wallets used the bare seed slice as a private key before the
    /// hierarchical path was adopted; this exists to recover such accounts.
    pub fn legacy_private_key_from_mnemonic(phrase: &str) -> AptosResult<[u8; 32]> {
        let mnemonic = Mnemonic::from_phrase(phrase)?;
        let seed = mnemonic.to_seed();
        let mut key = [0u8; 32];
        key.copy_from_slice(&seed[..32]);
        Ok(key)
    }

    /// Returns the account address (equal to the authentication key).
    pub fn address(&self) -> AccountAddress {
        AccountAddress::new(self.auth_key)
    }

    /// Returns the authentication key.
    pub fn authentication_key(&self) -> [u8; 32] {
        self.auth_key
    }

    /// Returns the public key.
    pub fn public_key(&self) -> &Ed25519PublicKey {
        &self.public_key
    }

    /// Returns a reference to the private key.
    ///
    /// **Warning**: Handle with care to avoid leaking key material.
    pub fn private_key(&self) -> &Ed25519PrivateKey {
        &self.private_key
    }

    /// Signs `data` with an optional domain-separation salt.
    ///
    /// When `salt` is non-empty the signed bytes are
    /// `SHA3-256(salt) || data`; with an empty salt the data is signed
    /// as-is. Deterministic: the same inputs always produce the same
    /// signature.
    pub fn sign(&self, data: &[u8], salt: &str) -> Ed25519Signature {
        let mut message = Vec::with_capacity(32 + data.len());
        if !salt.is_empty() {
            message.extend_from_slice(&sha3_256(salt.as_bytes()));
        }
        message.extend_from_slice(data);
        self.private_key.sign(&message)
    }
}

impl fmt::Debug for LocalAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalAccount")
            .field("address", &self.address())
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}
