//! # Aptos transaction builder
//!
//! A client-side transaction-construction and signing engine for the Aptos
//! blockchain. Everything a transaction touches on its way to the chain is
//! covered here: the canonical binary serialization (BCS) every signature
//! commits to, the textual Move type-signature grammar, ABI-driven coercion
//! of loosely-typed call arguments, raw-transaction assembly, and
//! single/multi-signature authenticator construction.
//!
//! Network transport is deliberately out of scope: callers feed in ledger
//! metadata and module descriptors they fetched themselves, and get back
//! opaque signing-message and signed-transaction bytes to submit.
//!
//! ## Quick start
//!
//! ```rust
//! use aptos_transaction_builder::account::LocalAccount;
//! use aptos_transaction_builder::transaction::{
//!     generate_bcs_transaction, EntryFunction, RawTransaction, TransactionPayload,
//! };
//! use aptos_transaction_builder::types::{AccountAddress, ChainId};
//!
//! # fn main() -> aptos_transaction_builder::AptosResult<()> {
//! let account = LocalAccount::from_seed([1u8; 32]);
//! let payload = TransactionPayload::EntryFunction(EntryFunction::apt_transfer(
//!     AccountAddress::from_hex("0xcd")?,
//!     100,
//! )?);
//! let raw_txn = RawTransaction::new(
//!     account.address(),
//!     0,
//!     payload,
//!     2000,
//!     100,
//!     1_700_000_000,
//!     ChainId::testnet(),
//! );
//! let signed_bytes = generate_bcs_transaction(&account, &raw_txn)?;
//! # assert!(!signed_bytes.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`bcs`] - the canonical binary codec underlying every wire type
//! - [`types`] - addresses, identifiers, type tags, and the type-tag grammar
//! - [`account`] - seed/mnemonic-derived signing accounts
//! - [`transaction`] - payloads, ABI builders, assembly, authenticators

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod account;
pub mod bcs;
pub mod error;
pub mod transaction;
pub mod types;

pub use error::{AptosError, AptosResult};
pub use types::{AccountAddress, ChainId, Identifier, ModuleId, StructTag, TypeTag};
