//! Error types for cryptographic operations.

use thiserror::Error;

/// A specialized Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors produced by key handling, signing, and signature aggregation.
///
/// All variants are local and synchronous; none represent transient
/// conditions.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// A public key had the wrong length or was not a valid curve point
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// A private key had the wrong length
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// A signature had the wrong length or malformed encoding
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Signature verification failed
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Multi-signature threshold exceeds the key count or the scheme maximum
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// The same signer bit was supplied twice
    #[error("Duplicated bit {0} detected")]
    DuplicateBit(u8),

    /// A signer bit index was outside the 32-slot bitmap
    #[error("Bit index {0} out of range (max 31)")]
    IndexOutOfRange(u8),

    /// Invalid mnemonic phrase
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Hierarchical key derivation failed
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// Error occurred during hex encoding/decoding
    #[error("Hex error: {0}")]
    Hex(#[from] hex::FromHexError),
}
