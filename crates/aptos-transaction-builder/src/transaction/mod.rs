//! Transaction construction and signing.
//!
//! The flow through this module mirrors a transaction's life: a payload is
//! produced (directly or through an ABI builder), assembled into a
//! [`RawTransaction`], hashed into a signing message, signed, and wrapped
//! with an authenticator into a [`SignedTransaction`] whose BCS bytes are
//! what a node accepts.

mod abi;
mod authenticator;
mod builder;
mod coerce;
mod payload;
mod remote;
mod types;

pub use abi::{
    AbiPayloadBuilder, ArgumentABI, EntryFunctionABI, ScriptABI, TransactionScriptABI,
    TypeArgumentABI,
};
pub use authenticator::{AccountAuthenticator, TransactionAuthenticator};
pub use builder::{
    generate_bcs_simulation, generate_bcs_transaction, sign_multi_agent_transaction,
    sign_transaction, Ed25519TransactionBuilder, MultiEd25519TransactionBuilder,
};
pub use coerce::{encode_arg, to_transaction_argument, ArgValue};
pub use payload::{
    EntryFunction, Module, ModuleBundle, Script, TransactionArgument, TransactionPayload,
};
pub use remote::{
    ModuleResolver, MoveFunction, MoveFunctionGenericTypeParam, MoveModule, MoveModuleAbi,
    RemoteAbiBuilder,
};
pub use types::{
    MultiAgentRawTransaction, RawTransaction, SignedTransaction, TransactionFactory,
    DEFAULT_EXPIRATION_SECS, DEFAULT_GAS_UNIT_PRICE, DEFAULT_MAX_GAS_AMOUNT,
    RAW_TRANSACTION_SALT, RAW_TRANSACTION_WITH_DATA_SALT,
};
