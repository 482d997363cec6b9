//! Raw and signed transaction types.
//!
//! The field order of [`RawTransaction`] is a wire-format invariant:
//! reordering any field changes the bytes every signature commits to and
//! breaks every produced signature.

use crate::bcs::{BcsDeserialize, BcsSerialize, Deserializer, Serializer};
use crate::error::{AptosError, AptosResult};
use crate::transaction::authenticator::TransactionAuthenticator;
use crate::transaction::payload::TransactionPayload;
use crate::types::{AccountAddress, ChainId};
use aptos_crypto::sha3_256;
use std::time::{SystemTime, UNIX_EPOCH};

/// Domain-separation salt for single-agent raw transactions.
pub const RAW_TRANSACTION_SALT: &str = "APTOS::RawTransaction";

/// Domain-separation salt for transactions wrapped with extra data
/// (multi-agent).
pub const RAW_TRANSACTION_WITH_DATA_SALT: &str = "APTOS::RawTransactionWithData";

/// The raw transaction a client signs.
///
/// A `RawTransaction` must never be mutated after its signing message has
/// been computed; any field change invalidates prior signatures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawTransaction {
    /// Sender's address.
    pub sender: AccountAddress,
    /// Sequence number of this transaction.
    pub sequence_number: u64,
    /// The transaction payload (entry function, script, module bundle).
    pub payload: TransactionPayload,
    /// Maximum gas units the sender is willing to pay.
    pub max_gas_amount: u64,
    /// Price per gas unit in octas.
    pub gas_unit_price: u64,
    /// Expiration time in seconds since Unix epoch.
    pub expiration_timestamp_secs: u64,
    /// Chain ID to prevent cross-chain replay.
    pub chain_id: ChainId,
}

impl RawTransaction {
    /// Creates a new raw transaction.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sender: AccountAddress,
        sequence_number: u64,
        payload: TransactionPayload,
        max_gas_amount: u64,
        gas_unit_price: u64,
        expiration_timestamp_secs: u64,
        chain_id: ChainId,
    ) -> Self {
        Self {
            sender,
            sequence_number,
            payload,
            max_gas_amount,
            gas_unit_price,
            expiration_timestamp_secs,
            chain_id,
        }
    }

    /// Generates the signing message for this transaction:
    /// `SHA3-256("APTOS::RawTransaction") || BCS(self)`.
    ///
    /// Byte-identical across repeated calls on identical input; signature
    /// verification depends on this determinism.
    pub fn signing_message(&self) -> AptosResult<Vec<u8>> {
        let prefix = sha3_256(RAW_TRANSACTION_SALT.as_bytes());
        let bcs_bytes = crate::bcs::to_bytes(self)?;

        let mut message = Vec::with_capacity(prefix.len() + bcs_bytes.len());
        message.extend_from_slice(&prefix);
        message.extend_from_slice(&bcs_bytes);
        Ok(message)
    }

    /// Serializes this transaction to BCS bytes.
    pub fn to_bcs(&self) -> AptosResult<Vec<u8>> {
        crate::bcs::to_bytes(self)
    }
}

impl BcsSerialize for RawTransaction {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        self.sender.serialize(serializer)?;
        serializer.serialize_u64(self.sequence_number);
        self.payload.serialize(serializer)?;
        serializer.serialize_u64(self.max_gas_amount);
        serializer.serialize_u64(self.gas_unit_price);
        serializer.serialize_u64(self.expiration_timestamp_secs);
        self.chain_id.serialize(serializer)
    }
}

impl BcsDeserialize for RawTransaction {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            sender: AccountAddress::deserialize(deserializer)?,
            sequence_number: deserializer.deserialize_u64()?,
            payload: TransactionPayload::deserialize(deserializer)?,
            max_gas_amount: deserializer.deserialize_u64()?,
            gas_unit_price: deserializer.deserialize_u64()?,
            expiration_timestamp_secs: deserializer.deserialize_u64()?,
            chain_id: ChainId::deserialize(deserializer)?,
        })
    }
}

/// A raw transaction wrapped with secondary signer addresses.
///
/// On the wire this is the `MultiAgent` variant (index 0) of the
/// `RawTransactionWithData` enum, and it signs under the alternate salt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiAgentRawTransaction {
    /// The inner raw transaction.
    pub raw_txn: RawTransaction,
    /// Secondary signer addresses.
    pub secondary_signer_addresses: Vec<AccountAddress>,
}

impl MultiAgentRawTransaction {
    /// Creates a new multi-agent transaction.
    pub fn new(raw_txn: RawTransaction, secondary_signer_addresses: Vec<AccountAddress>) -> Self {
        Self {
            raw_txn,
            secondary_signer_addresses,
        }
    }

    /// Generates the signing message:
    /// `SHA3-256("APTOS::RawTransactionWithData") ||
    /// BCS(RawTransactionWithData::MultiAgent)`.
    pub fn signing_message(&self) -> AptosResult<Vec<u8>> {
        let prefix = sha3_256(RAW_TRANSACTION_WITH_DATA_SALT.as_bytes());

        let mut serializer = Serializer::new();
        // RawTransactionWithData::MultiAgent is variant 0
        serializer.serialize_uleb128(0);
        self.raw_txn.serialize(&mut serializer)?;
        self.secondary_signer_addresses.serialize(&mut serializer)?;
        let bcs_bytes = serializer.into_bytes();

        let mut message = Vec::with_capacity(prefix.len() + bcs_bytes.len());
        message.extend_from_slice(&prefix);
        message.extend_from_slice(&bcs_bytes);
        Ok(message)
    }
}

/// A signed transaction ready for submission.
///
/// Immutable once built: the raw transaction and authenticator are fixed
/// together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    /// The raw transaction.
    pub raw_txn: RawTransaction,
    /// The authenticator proving authorization.
    pub authenticator: TransactionAuthenticator,
}

impl SignedTransaction {
    /// Creates a new signed transaction.
    pub fn new(raw_txn: RawTransaction, authenticator: TransactionAuthenticator) -> Self {
        Self {
            raw_txn,
            authenticator,
        }
    }

    /// Serializes this signed transaction to the BCS bytes a node accepts.
    pub fn to_bcs(&self) -> AptosResult<Vec<u8>> {
        crate::bcs::to_bytes(self)
    }

    /// Returns the sender address.
    pub fn sender(&self) -> AccountAddress {
        self.raw_txn.sender
    }

    /// Returns the sequence number.
    pub fn sequence_number(&self) -> u64 {
        self.raw_txn.sequence_number
    }
}

impl BcsSerialize for SignedTransaction {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        self.raw_txn.serialize(serializer)?;
        self.authenticator.serialize(serializer)
    }
}

impl BcsDeserialize for SignedTransaction {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            raw_txn: RawTransaction::deserialize(deserializer)?,
            authenticator: TransactionAuthenticator::deserialize(deserializer)?,
        })
    }
}

/// Default maximum gas amount.
pub const DEFAULT_MAX_GAS_AMOUNT: u64 = 2000;
/// Default gas unit price in octas.
pub const DEFAULT_GAS_UNIT_PRICE: u64 = 1;
/// Default expiration window in seconds.
pub const DEFAULT_EXPIRATION_SECS: u64 = 20;

/// A builder assembling [`RawTransaction`]s from caller-supplied fields.
///
/// Sender, sequence number, payload, and chain ID are required; gas and
/// expiration fall back to defaults.
///
/// # Example
///
/// ```rust
/// use aptos_transaction_builder::transaction::{EntryFunction, TransactionFactory};
/// use aptos_transaction_builder::types::{AccountAddress, ChainId};
///
/// let payload = EntryFunction::apt_transfer(AccountAddress::ONE, 100).unwrap();
/// let txn = TransactionFactory::new()
///     .sender(AccountAddress::ONE)
///     .sequence_number(7)
///     .payload(payload.into())
///     .chain_id(ChainId::testnet())
///     .build()
///     .unwrap();
/// assert_eq!(txn.sequence_number, 7);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransactionFactory {
    sender: Option<AccountAddress>,
    sequence_number: Option<u64>,
    payload: Option<TransactionPayload>,
    max_gas_amount: Option<u64>,
    gas_unit_price: Option<u64>,
    expiration_timestamp_secs: Option<u64>,
    chain_id: Option<ChainId>,
}

impl TransactionFactory {
    /// Creates a new factory with default gas and expiration values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sender address.
    #[must_use]
    pub fn sender(mut self, sender: AccountAddress) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Sets the sequence number.
    #[must_use]
    pub fn sequence_number(mut self, sequence_number: u64) -> Self {
        self.sequence_number = Some(sequence_number);
        self
    }

    /// Sets the transaction payload.
    #[must_use]
    pub fn payload(mut self, payload: TransactionPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Sets the maximum gas amount.
    #[must_use]
    pub fn max_gas_amount(mut self, max_gas_amount: u64) -> Self {
        self.max_gas_amount = Some(max_gas_amount);
        self
    }

    /// Sets the gas unit price in octas.
    #[must_use]
    pub fn gas_unit_price(mut self, gas_unit_price: u64) -> Self {
        self.gas_unit_price = Some(gas_unit_price);
        self
    }

    /// Sets the expiration timestamp in seconds since Unix epoch.
    #[must_use]
    pub fn expiration_timestamp_secs(mut self, secs: u64) -> Self {
        self.expiration_timestamp_secs = Some(secs);
        self
    }

    /// Sets the expiration relative to the current system time.
    #[must_use]
    pub fn expiration_from_now(mut self, secs: u64) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.expiration_timestamp_secs = Some(now.saturating_add(secs));
        self
    }

    /// Sets the chain ID.
    #[must_use]
    pub fn chain_id(mut self, chain_id: ChainId) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Builds the raw transaction.
    ///
    /// # Errors
    ///
    /// Fails if sender, sequence number, payload, or chain ID is missing.
    pub fn build(self) -> AptosResult<RawTransaction> {
        let sender = self
            .sender
            .ok_or_else(|| AptosError::transaction("sender is required"))?;
        let sequence_number = self
            .sequence_number
            .ok_or_else(|| AptosError::transaction("sequence_number is required"))?;
        let payload = self
            .payload
            .ok_or_else(|| AptosError::transaction("payload is required"))?;
        let chain_id = self
            .chain_id
            .ok_or_else(|| AptosError::transaction("chain_id is required"))?;

        let expiration_timestamp_secs = self.expiration_timestamp_secs.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs()
                .saturating_add(DEFAULT_EXPIRATION_SECS)
        });

        Ok(RawTransaction::new(
            sender,
            sequence_number,
            payload,
            self.max_gas_amount.unwrap_or(DEFAULT_MAX_GAS_AMOUNT),
            self.gas_unit_price.unwrap_or(DEFAULT_GAS_UNIT_PRICE),
            expiration_timestamp_secs,
            chain_id,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::payload::EntryFunction;

    fn test_raw_transaction() -> RawTransaction {
        RawTransaction::new(
            AccountAddress::ONE,
            0,
            TransactionPayload::EntryFunction(
                EntryFunction::apt_transfer(AccountAddress::ONE, 1000).unwrap(),
            ),
            2000,
            1,
            1_700_000_000,
            ChainId::testnet(),
        )
    }

    #[test]
    fn test_signing_message_layout() {
        let txn = test_raw_transaction();
        let message = txn.signing_message().unwrap();
        // 32-byte salt hash followed by the BCS body
        assert_eq!(message.len(), 32 + txn.to_bcs().unwrap().len());
        assert_eq!(&message[..32], sha3_256(b"APTOS::RawTransaction"));
    }

    #[test]
    fn test_signing_message_is_deterministic() {
        let txn = test_raw_transaction();
        assert_eq!(txn.signing_message().unwrap(), txn.signing_message().unwrap());
    }

    #[test]
    fn test_field_change_changes_message() {
        let txn = test_raw_transaction();
        let mut bumped = txn.clone();
        bumped.sequence_number += 1;
        assert_ne!(
            txn.signing_message().unwrap(),
            bumped.signing_message().unwrap()
        );
    }

    #[test]
    fn test_raw_transaction_bcs_roundtrip() {
        let txn = test_raw_transaction();
        let bytes = txn.to_bcs().unwrap();
        let decoded: RawTransaction = crate::bcs::from_bytes(&bytes).unwrap();
        assert_eq!(txn, decoded);
    }

    #[test]
    fn test_raw_transaction_field_order() {
        let txn = test_raw_transaction();
        let bytes = txn.to_bcs().unwrap();
        // sender is the first field on the wire
        assert_eq!(&bytes[..32], txn.sender.as_bytes());
        // sequence number follows, little-endian
        assert_eq!(&bytes[32..40], &0u64.to_le_bytes());
        // chain id is the final byte
        assert_eq!(bytes[bytes.len() - 1], 2);
    }

    #[test]
    fn test_multi_agent_signing_message() {
        let txn = test_raw_transaction();
        let multi_agent =
            MultiAgentRawTransaction::new(txn.clone(), vec![AccountAddress::from_hex("0x2").unwrap()]);
        let message = multi_agent.signing_message().unwrap();

        assert_eq!(&message[..32], sha3_256(b"APTOS::RawTransactionWithData"));
        // enum variant index follows the salt hash
        assert_eq!(message[32], 0);
        // and differs from the single-agent message
        assert_ne!(message, txn.signing_message().unwrap());
    }

    #[test]
    fn test_factory_defaults() {
        let payload = EntryFunction::apt_transfer(AccountAddress::ONE, 1).unwrap();
        let txn = TransactionFactory::new()
            .sender(AccountAddress::ONE)
            .sequence_number(0)
            .payload(payload.into())
            .chain_id(ChainId::testnet())
            .build()
            .unwrap();
        assert_eq!(txn.max_gas_amount, DEFAULT_MAX_GAS_AMOUNT);
        assert_eq!(txn.gas_unit_price, DEFAULT_GAS_UNIT_PRICE);
        assert!(txn.expiration_timestamp_secs > 0);
    }

    #[test]
    fn test_factory_missing_fields() {
        assert!(TransactionFactory::new().build().is_err());

        let payload = EntryFunction::apt_transfer(AccountAddress::ONE, 1).unwrap();
        let result = TransactionFactory::new()
            .sequence_number(0)
            .payload(payload.into())
            .chain_id(ChainId::testnet())
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_factory_custom_values() {
        let payload = EntryFunction::apt_transfer(AccountAddress::ONE, 1).unwrap();
        let txn = TransactionFactory::new()
            .sender(AccountAddress::ONE)
            .sequence_number(3)
            .payload(payload.into())
            .max_gas_amount(500_000)
            .gas_unit_price(200)
            .expiration_timestamp_secs(9_999_999_999)
            .chain_id(ChainId::mainnet())
            .build()
            .unwrap();
        assert_eq!(txn.max_gas_amount, 500_000);
        assert_eq!(txn.gas_unit_price, 200);
        assert_eq!(txn.expiration_timestamp_secs, 9_999_999_999);
    }
}
