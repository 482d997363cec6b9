//! Chain ID type.
//!
//! The chain ID identifies which Aptos network a transaction is intended
//! for, preventing replay across networks. It is the last field of every
//! raw transaction.

use crate::bcs::{BcsDeserialize, BcsSerialize, Deserializer, Serializer};
use crate::error::AptosResult;
use std::fmt;

/// A chain identifier for an Aptos network.
///
/// # Known Chain IDs
///
/// - Mainnet: 1
/// - Testnet: 2
/// - Devnet: varies
///
/// # Example
///
/// ```rust
/// use aptos_transaction_builder::types::ChainId;
///
/// let mainnet = ChainId::mainnet();
/// assert_eq!(mainnet.id(), 1);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(u8);

impl ChainId {
    /// Creates a new chain ID.
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Returns the chain ID for mainnet (1).
    pub const fn mainnet() -> Self {
        Self(1)
    }

    /// Returns the chain ID for testnet (2).
    pub const fn testnet() -> Self {
        Self(2)
    }

    /// Returns the numeric chain ID value.
    pub const fn id(&self) -> u8 {
        self.0
    }

    /// Returns true if this is the mainnet chain ID.
    pub const fn is_mainnet(&self) -> bool {
        self.0 == 1
    }
}

impl fmt::Debug for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainId({})", self.0)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for ChainId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u8 {
    fn from(chain_id: ChainId) -> Self {
        chain_id.0
    }
}

impl BcsSerialize for ChainId {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.serialize_u8(self.0);
        Ok(())
    }
}

impl BcsDeserialize for ChainId {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self(deserializer.deserialize_u8()?))
    }
}
