//! Core Move/Aptos types.
//!
//! This module contains the fundamental types used throughout the builder:
//! account addresses, chain IDs, identifiers, and the structural type-tag
//! tree together with its textual grammar.

mod address;
mod chain_id;
mod move_types;
mod parser;

pub use address::{AccountAddress, ADDRESS_LENGTH};
pub use chain_id::ChainId;
pub use move_types::{Identifier, ModuleId, StructTag, TypeTag};
pub use parser::parse_type_tag;
