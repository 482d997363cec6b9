//! Error types for transaction construction.
//!
//! This module provides a unified error type [`AptosError`] covering every
//! failure the construction pipeline can produce. All variants are local,
//! synchronous, and non-retryable: a failed build never yields a partially
//! usable byte sequence.

use thiserror::Error;

/// A specialized Result type for transaction-construction operations.
pub type AptosResult<T> = Result<T, AptosError>;

/// The main error type for transaction construction.
#[derive(Error, Debug)]
pub enum AptosError {
    /// The type-signature tokenizer hit a byte it does not recognize
    #[error("Lex error: {0}")]
    Lex(String),

    /// The type-signature parser rejected the token stream
    #[error("Parse error: {0}")]
    Parse(String),

    /// Two ABI blobs resolved to the same lookup key
    #[error("Found conflicting ABI interfaces for {0}")]
    ConflictingAbi(String),

    /// No ABI was registered under the requested key
    #[error("Cannot find function: {0}")]
    NotFound(String),

    /// Supplied argument count does not match the ABI parameter count
    #[error("Arity mismatch: expected {expected} arguments, got {provided}")]
    ArityMismatch {
        /// Number of parameters the ABI declares (after signer stripping)
        expected: usize,
        /// Number of arguments the caller supplied
        provided: usize,
    },

    /// An argument value cannot be coerced to its parameter type
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// The parameter type itself is not supported by the coercion table
    #[error("Unsupported argument type: {0}")]
    UnsupportedType(String),

    /// A value exceeds the width of its binary field
    #[error("Encoding overflow: {0}")]
    EncodingOverflow(String),

    /// Error occurred during BCS serialization/deserialization
    #[error("BCS error: {0}")]
    Bcs(String),

    /// Invalid account address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid identifier (module/function/struct name)
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Transaction assembly error (missing or inconsistent fields)
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Error from the cryptographic layer (key lengths, bitmap bits, ...)
    #[error(transparent)]
    Crypto(#[from] aptos_crypto::CryptoError),

    /// Error occurred during JSON deserialization of a module descriptor
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error occurred during hex encoding/decoding
    #[error("Hex error: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Any other error
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AptosError {
    /// Creates a new BCS error
    pub fn bcs<E: std::fmt::Display>(err: E) -> Self {
        Self::Bcs(err.to_string())
    }

    /// Creates a new transaction assembly error
    pub fn transaction<S: Into<String>>(msg: S) -> Self {
        Self::Transaction(msg.into())
    }

    /// Returns true if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
