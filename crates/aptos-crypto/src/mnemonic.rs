//! BIP-39 mnemonic phrases and hierarchical Ed25519 key derivation.

use crate::ed25519::Ed25519PrivateKey;
use crate::error::{CryptoError, CryptoResult};

/// The fixed Aptos hierarchical derivation path (account index 0).
pub const APTOS_DERIVATION_PATH: &str = "m/44'/637'/0'/0'/0'";

/// A BIP-39 mnemonic phrase for key derivation.
///
/// # Example
///
/// ```rust
/// use aptos_crypto::Mnemonic;
///
/// let mnemonic = Mnemonic::from_phrase(
///     "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
/// ).unwrap();
/// let key = mnemonic.derive_ed25519_key(0).unwrap();
/// ```
#[derive(Clone)]
pub struct Mnemonic {
    phrase: String,
}

impl Mnemonic {
    /// Generates a new random mnemonic phrase.
    ///
    /// # Arguments
    ///
    /// * `word_count` - Number of words (12, 15, 18, 21, or 24)
    pub fn generate(word_count: usize) -> CryptoResult<Self> {
        let entropy_bytes = match word_count {
            12 => 16,
            15 => 20,
            18 => 24,
            21 => 28,
            24 => 32,
            _ => {
                return Err(CryptoError::InvalidMnemonic(format!(
                    "invalid word count: {}, must be 12, 15, 18, 21, or 24",
                    word_count
                )));
            }
        };

        let mut entropy = vec![0u8; entropy_bytes];
        rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut entropy);

        let mnemonic = bip39::Mnemonic::from_entropy(&entropy)
            .map_err(|e| CryptoError::InvalidMnemonic(e.to_string()))?;

        Ok(Self {
            phrase: mnemonic.to_string(),
        })
    }

    /// Creates a mnemonic from an existing phrase, validating it.
    pub fn from_phrase(phrase: &str) -> CryptoResult<Self> {
        let _mnemonic = bip39::Mnemonic::parse_normalized(phrase)
            .map_err(|e| CryptoError::InvalidMnemonic(e.to_string()))?;

        Ok(Self {
            phrase: phrase.to_string(),
        })
    }

    /// Returns the mnemonic phrase.
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// Derives the 64-byte BIP-39 seed with an empty passphrase.
    pub fn to_seed(&self) -> [u8; 64] {
        self.to_seed_with_passphrase("")
    }

    /// Derives the 64-byte BIP-39 seed with a passphrase.
    pub fn to_seed_with_passphrase(&self, passphrase: &str) -> [u8; 64] {
        // The phrase was validated during construction.
        let mnemonic = bip39::Mnemonic::parse_normalized(&self.phrase)
            .expect("internal error: mnemonic was validated during construction");
        mnemonic.to_seed(passphrase)
    }

    /// Derives an Ed25519 private key along `m/44'/637'/0'/0'/index'`.
    pub fn derive_ed25519_key(&self, index: u32) -> CryptoResult<Ed25519PrivateKey> {
        let seed = self.to_seed();
        let key = derive_ed25519_from_seed(&seed, index)?;
        Ed25519PrivateKey::from_bytes(&key)
    }
}

/// Derives an Ed25519 key from a seed using the Aptos BIP-44 path.
///
/// This implements SLIP-0010 derivation for Ed25519; every path component
/// is hardened.
fn derive_ed25519_from_seed(seed: &[u8], index: u32) -> CryptoResult<[u8; 32]> {
    use hmac::{Hmac, Mac};
    use sha2::Sha512;

    type HmacSha512 = Hmac<Sha512>;

    // SLIP-0010 master key derivation
    let mut mac = HmacSha512::new_from_slice(b"ed25519 seed")
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    mac.update(seed);
    let result = mac.finalize().into_bytes();

    let mut key = [0u8; 32];
    let mut chain_code = [0u8; 32];
    key.copy_from_slice(&result[..32]);
    chain_code.copy_from_slice(&result[32..]);

    // m/44'/637'/0'/0'/index' with every component hardened
    let path = [
        44 | 0x8000_0000,
        637 | 0x8000_0000,
        0x8000_0000,
        0x8000_0000,
        index | 0x8000_0000,
    ];

    for child_index in path {
        let mut data = vec![0u8];
        data.extend_from_slice(&key);
        data.extend_from_slice(&u32::to_be_bytes(child_index));

        let mut mac = HmacSha512::new_from_slice(&chain_code)
            .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
        mac.update(&data);
        let result = mac.finalize().into_bytes();

        key.copy_from_slice(&result[..32]);
        chain_code.copy_from_slice(&result[32..]);
    }

    Ok(key)
}

impl std::fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mnemonic([REDACTED])")
    }
}
