//! Transaction authenticators.
//!
//! An authenticator is the wire structure proving a transaction was
//! authorized. Variant indices are fixed by the chain: Ed25519=0,
//! MultiEd25519=1, MultiAgent=2. Key and signature material is carried as
//! ULEB128 length-prefixed byte strings.

use crate::bcs::{BcsDeserialize, BcsSerialize, Deserializer, Serializer};
use crate::error::{AptosError, AptosResult};
use crate::types::AccountAddress;
use aptos_crypto::{
    Ed25519PublicKey, Ed25519Signature, MultiEd25519PublicKey, MultiEd25519Signature,
};

/// An authenticator for a whole transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionAuthenticator {
    /// Ed25519 single-key authentication (variant 0).
    Ed25519 {
        /// The Ed25519 public key (32 bytes).
        public_key: Ed25519PublicKey,
        /// The Ed25519 signature (64 bytes).
        signature: Ed25519Signature,
    },
    /// Multi-Ed25519 k-of-n authentication (variant 1).
    MultiEd25519 {
        /// The aggregated public key (keys ‖ threshold).
        public_key: MultiEd25519PublicKey,
        /// The aggregated signature (signatures ‖ bitmap).
        signature: MultiEd25519Signature,
    },
    /// Multi-agent authentication (variant 2).
    MultiAgent {
        /// The sender's authenticator.
        sender: AccountAuthenticator,
        /// Secondary signer addresses, in signing-message order.
        secondary_signer_addresses: Vec<AccountAddress>,
        /// Secondary signers' authenticators, aligned with the addresses.
        secondary_signers: Vec<AccountAuthenticator>,
    },
}

impl TransactionAuthenticator {
    /// Creates an Ed25519 single-signer authenticator.
    pub fn ed25519(public_key: Ed25519PublicKey, signature: Ed25519Signature) -> Self {
        Self::Ed25519 {
            public_key,
            signature,
        }
    }

    /// Creates a multi-Ed25519 authenticator.
    pub fn multi_ed25519(
        public_key: MultiEd25519PublicKey,
        signature: MultiEd25519Signature,
    ) -> Self {
        Self::MultiEd25519 {
            public_key,
            signature,
        }
    }

    /// Creates a multi-agent authenticator.
    pub fn multi_agent(
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
    ) -> Self {
        Self::MultiAgent {
            sender,
            secondary_signer_addresses,
            secondary_signers,
        }
    }
}

impl BcsSerialize for TransactionAuthenticator {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        match self {
            TransactionAuthenticator::Ed25519 {
                public_key,
                signature,
            } => {
                serializer.serialize_uleb128(0);
                serializer.serialize_bytes(public_key.as_bytes());
                serializer.serialize_bytes(signature.as_bytes());
                Ok(())
            }
            TransactionAuthenticator::MultiEd25519 {
                public_key,
                signature,
            } => {
                serializer.serialize_uleb128(1);
                serializer.serialize_bytes(&public_key.to_bytes());
                serializer.serialize_bytes(&signature.to_bytes());
                Ok(())
            }
            TransactionAuthenticator::MultiAgent {
                sender,
                secondary_signer_addresses,
                secondary_signers,
            } => {
                serializer.serialize_uleb128(2);
                sender.serialize(serializer)?;
                secondary_signer_addresses.serialize(serializer)?;
                secondary_signers.serialize(serializer)
            }
        }
    }
}

impl BcsDeserialize for TransactionAuthenticator {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        match deserializer.deserialize_uleb128()? {
            0 => {
                let public_key = Ed25519PublicKey::from_bytes(&deserializer.deserialize_bytes()?)?;
                let signature = Ed25519Signature::from_bytes(&deserializer.deserialize_bytes()?)?;
                Ok(Self::Ed25519 {
                    public_key,
                    signature,
                })
            }
            1 => {
                let public_key =
                    MultiEd25519PublicKey::from_bytes(&deserializer.deserialize_bytes()?)?;
                let signature =
                    MultiEd25519Signature::from_bytes(&deserializer.deserialize_bytes()?)?;
                Ok(Self::MultiEd25519 {
                    public_key,
                    signature,
                })
            }
            2 => Ok(Self::MultiAgent {
                sender: AccountAuthenticator::deserialize(deserializer)?,
                secondary_signer_addresses: Vec::<AccountAddress>::deserialize(deserializer)?,
                secondary_signers: Vec::<AccountAuthenticator>::deserialize(deserializer)?,
            }),
            v => Err(AptosError::Bcs(format!(
                "unknown TransactionAuthenticator variant {v}"
            ))),
        }
    }
}

/// An authenticator for a single account within a multi-agent
/// transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccountAuthenticator {
    /// Ed25519 authentication (variant 0).
    Ed25519 {
        /// The public key (32 bytes).
        public_key: Ed25519PublicKey,
        /// The signature (64 bytes).
        signature: Ed25519Signature,
    },
    /// Multi-Ed25519 authentication (variant 1).
    MultiEd25519 {
        /// The aggregated public key.
        public_key: MultiEd25519PublicKey,
        /// The aggregated signature.
        signature: MultiEd25519Signature,
    },
}

impl AccountAuthenticator {
    /// Creates an Ed25519 account authenticator.
    pub fn ed25519(public_key: Ed25519PublicKey, signature: Ed25519Signature) -> Self {
        Self::Ed25519 {
            public_key,
            signature,
        }
    }
}

impl BcsSerialize for AccountAuthenticator {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        match self {
            AccountAuthenticator::Ed25519 {
                public_key,
                signature,
            } => {
                serializer.serialize_uleb128(0);
                serializer.serialize_bytes(public_key.as_bytes());
                serializer.serialize_bytes(signature.as_bytes());
            }
            AccountAuthenticator::MultiEd25519 {
                public_key,
                signature,
            } => {
                serializer.serialize_uleb128(1);
                serializer.serialize_bytes(&public_key.to_bytes());
                serializer.serialize_bytes(&signature.to_bytes());
            }
        }
        Ok(())
    }
}

impl BcsDeserialize for AccountAuthenticator {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        match deserializer.deserialize_uleb128()? {
            0 => {
                let public_key = Ed25519PublicKey::from_bytes(&deserializer.deserialize_bytes()?)?;
                let signature = Ed25519Signature::from_bytes(&deserializer.deserialize_bytes()?)?;
                Ok(Self::Ed25519 {
                    public_key,
                    signature,
                })
            }
            1 => {
                let public_key =
                    MultiEd25519PublicKey::from_bytes(&deserializer.deserialize_bytes()?)?;
                let signature =
                    MultiEd25519Signature::from_bytes(&deserializer.deserialize_bytes()?)?;
                Ok(Self::MultiEd25519 {
                    public_key,
                    signature,
                })
            }
            v => Err(AptosError::Bcs(format!(
                "unknown AccountAuthenticator variant {v}"
            ))),
        }
    }
}
