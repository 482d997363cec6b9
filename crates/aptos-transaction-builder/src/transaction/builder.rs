//! Signing builders.
//!
//! The builders here close the loop from an assembled [`RawTransaction`]
//! to submittable BCS bytes. Signing itself is pluggable: a builder holds
//! a signing function plus the public-key material for the authenticator,
//! so hardware wallets and remote signers fit the same shape as local
//! keys.

use crate::account::LocalAccount;
use crate::error::AptosResult;
use crate::transaction::authenticator::{AccountAuthenticator, TransactionAuthenticator};
use crate::transaction::types::{MultiAgentRawTransaction, RawTransaction, SignedTransaction};
use aptos_crypto::{
    Ed25519PrivateKey, Ed25519PublicKey, Ed25519Signature, MultiEd25519PublicKey,
    MultiEd25519Signature,
};

/// Signs raw transactions with a single Ed25519 key.
///
/// The signing function receives the complete signing message (salt hash
/// plus BCS body) and returns a 64-byte signature.
pub struct Ed25519TransactionBuilder {
    signing_fn: Box<dyn Fn(&[u8]) -> Vec<u8> + Send + Sync>,
    public_key: Ed25519PublicKey,
}

impl Ed25519TransactionBuilder {
    /// Creates a builder from a signing function and the matching public
    /// key.
    pub fn new(
        public_key: Ed25519PublicKey,
        signing_fn: impl Fn(&[u8]) -> Vec<u8> + Send + Sync + 'static,
    ) -> Self {
        Self {
            signing_fn: Box::new(signing_fn),
            public_key,
        }
    }

    /// Signs the transaction and returns the signed-transaction BCS
    /// bytes.
    ///
    /// # Errors
    ///
    /// Fails if the signing function returns bytes of the wrong length
    /// or serialization fails.
    pub fn sign(&self, raw_txn: &RawTransaction) -> AptosResult<Vec<u8>> {
        let signing_message = raw_txn.signing_message()?;
        let signature_bytes = (self.signing_fn)(&signing_message);
        let signature = Ed25519Signature::from_bytes(&signature_bytes)?;

        let authenticator = TransactionAuthenticator::ed25519(self.public_key, signature);
        SignedTransaction::new(raw_txn.clone(), authenticator).to_bcs()
    }
}

impl std::fmt::Debug for Ed25519TransactionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519TransactionBuilder")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// Signs raw transactions under a k-of-n multi-Ed25519 account.
///
/// The signing function returns the already-aggregated signature;
/// collecting the individual (bit index, signature) pairs from the
/// participating signers is the caller's orchestration.
pub struct MultiEd25519TransactionBuilder {
    signing_fn: Box<dyn Fn(&[u8]) -> AptosResult<MultiEd25519Signature> + Send + Sync>,
    public_key: MultiEd25519PublicKey,
}

impl MultiEd25519TransactionBuilder {
    /// Creates a builder from a signing function and the aggregated
    /// public key.
    pub fn new(
        public_key: MultiEd25519PublicKey,
        signing_fn: impl Fn(&[u8]) -> AptosResult<MultiEd25519Signature> + Send + Sync + 'static,
    ) -> Self {
        Self {
            signing_fn: Box::new(signing_fn),
            public_key,
        }
    }

    /// Signs the transaction and returns the signed-transaction BCS
    /// bytes.
    pub fn sign(&self, raw_txn: &RawTransaction) -> AptosResult<Vec<u8>> {
        let signing_message = raw_txn.signing_message()?;
        let signature = (self.signing_fn)(&signing_message)?;

        let authenticator =
            TransactionAuthenticator::multi_ed25519(self.public_key.clone(), signature);
        SignedTransaction::new(raw_txn.clone(), authenticator).to_bcs()
    }
}

impl std::fmt::Debug for MultiEd25519TransactionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiEd25519TransactionBuilder")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// Signs a raw transaction with a local account.
pub fn sign_transaction(
    account: &LocalAccount,
    raw_txn: &RawTransaction,
) -> AptosResult<SignedTransaction> {
    let signing_message = raw_txn.signing_message()?;
    // The signing message already carries the salt hash prefix
    let signature = account.sign(&signing_message, "");
    let authenticator = TransactionAuthenticator::ed25519(*account.public_key(), signature);
    Ok(SignedTransaction::new(raw_txn.clone(), authenticator))
}

/// Signs a multi-agent transaction with the sender and every secondary
/// signer, all over the identical signing message.
pub fn sign_multi_agent_transaction(
    sender: &LocalAccount,
    multi_agent: &MultiAgentRawTransaction,
    secondary_signers: &[&LocalAccount],
) -> AptosResult<SignedTransaction> {
    let signing_message = multi_agent.signing_message()?;

    let sender_auth = AccountAuthenticator::ed25519(
        *sender.public_key(),
        sender.sign(&signing_message, ""),
    );

    let secondary_auths = secondary_signers
        .iter()
        .map(|signer| {
            AccountAuthenticator::ed25519(
                *signer.public_key(),
                signer.sign(&signing_message, ""),
            )
        })
        .collect();

    let authenticator = TransactionAuthenticator::multi_agent(
        sender_auth,
        multi_agent.secondary_signer_addresses.clone(),
        secondary_auths,
    );

    Ok(SignedTransaction::new(
        multi_agent.raw_txn.clone(),
        authenticator,
    ))
}

/// Signs a raw transaction with a local account and returns the
/// submittable BCS bytes.
pub fn generate_bcs_transaction(
    account: &LocalAccount,
    raw_txn: &RawTransaction,
) -> AptosResult<Vec<u8>> {
    sign_transaction(account, raw_txn)?.to_bcs()
}

/// Produces submittable-but-unverifiable bytes for fee estimation.
///
/// The transaction is signed with a fixed all-zero-seed key while the
/// account's real public key rides in the authenticator, so a node can
/// simulate execution without accepting the transaction.
pub fn generate_bcs_simulation(
    account: &LocalAccount,
    raw_txn: &RawTransaction,
) -> AptosResult<Vec<u8>> {
    let signing_message = raw_txn.signing_message()?;
    let placeholder = Ed25519PrivateKey::from_bytes(&[0u8; 32])?;
    let signature = placeholder.sign(&signing_message);

    let authenticator = TransactionAuthenticator::ed25519(*account.public_key(), signature);
    SignedTransaction::new(raw_txn.clone(), authenticator).to_bcs()
}
