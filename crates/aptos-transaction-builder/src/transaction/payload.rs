//! Transaction payloads.
//!
//! Variant indices on [`TransactionPayload`] and [`TransactionArgument`]
//! are fixed by the chain's canonical format; reordering either enum would
//! break every produced signature.

use crate::bcs::{BcsDeserialize, BcsSerialize, Deserializer, Serializer};
use crate::error::{AptosError, AptosResult};
use crate::types::{AccountAddress, Identifier, ModuleId, TypeTag};

/// The payload of a transaction, specifying what action to take.
///
/// Variant indices: Script=0, ModuleBundle=1, EntryFunction=2.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionPayload {
    /// Execute a script with inline bytecode (variant 0).
    Script(Script),
    /// Publish a bundle of modules (variant 1).
    ModuleBundle(ModuleBundle),
    /// Call an entry function on a published module (variant 2).
    EntryFunction(EntryFunction),
}

impl BcsSerialize for TransactionPayload {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        match self {
            TransactionPayload::Script(script) => {
                serializer.serialize_uleb128(0);
                script.serialize(serializer)
            }
            TransactionPayload::ModuleBundle(bundle) => {
                serializer.serialize_uleb128(1);
                bundle.serialize(serializer)
            }
            TransactionPayload::EntryFunction(entry) => {
                serializer.serialize_uleb128(2);
                entry.serialize(serializer)
            }
        }
    }
}

impl BcsDeserialize for TransactionPayload {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        match deserializer.deserialize_uleb128()? {
            0 => Ok(Self::Script(Script::deserialize(deserializer)?)),
            1 => Ok(Self::ModuleBundle(ModuleBundle::deserialize(deserializer)?)),
            2 => Ok(Self::EntryFunction(EntryFunction::deserialize(
                deserializer,
            )?)),
            v => Err(AptosError::Bcs(format!(
                "unknown TransactionPayload variant {v}"
            ))),
        }
    }
}

/// A script payload with inline Move bytecode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Script {
    /// The Move bytecode to execute.
    pub code: Vec<u8>,
    /// Type arguments for the script.
    pub ty_args: Vec<TypeTag>,
    /// Arguments to the script.
    pub args: Vec<TransactionArgument>,
}

impl Script {
    /// Creates a new script payload.
    pub fn new(code: Vec<u8>, ty_args: Vec<TypeTag>, args: Vec<TransactionArgument>) -> Self {
        Self {
            code,
            ty_args,
            args,
        }
    }
}

impl BcsSerialize for Script {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.serialize_bytes(&self.code);
        self.ty_args.serialize(serializer)?;
        self.args.serialize(serializer)
    }
}

impl BcsDeserialize for Script {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            code: deserializer.deserialize_bytes()?,
            ty_args: Vec::<TypeTag>::deserialize(deserializer)?,
            args: Vec::<TransactionArgument>::deserialize(deserializer)?,
        })
    }
}

/// A bundle of modules to publish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleBundle {
    /// The modules, each as compiled bytecode.
    pub codes: Vec<Module>,
}

/// A single module's compiled bytecode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Module {
    /// The compiled Move bytecode.
    pub code: Vec<u8>,
}

impl BcsSerialize for ModuleBundle {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        self.codes.serialize(serializer)
    }
}

impl BcsDeserialize for ModuleBundle {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            codes: Vec::<Module>::deserialize(deserializer)?,
        })
    }
}

impl BcsSerialize for Module {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.serialize_bytes(&self.code);
        Ok(())
    }
}

impl BcsDeserialize for Module {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            code: deserializer.deserialize_bytes()?,
        })
    }
}

/// An entry function call payload.
///
/// Entry functions are the most common payload: a call to a function
/// marked `entry` in a published module, with every argument already
/// BCS-encoded into its own byte blob.
///
/// # Example
///
/// ```rust
/// use aptos_transaction_builder::transaction::EntryFunction;
/// use aptos_transaction_builder::types::AccountAddress;
///
/// let recipient = AccountAddress::from_hex("0x123").unwrap();
/// let entry = EntryFunction::coin_transfer(
///     aptos_transaction_builder::types::TypeTag::aptos_coin(),
///     recipient,
///     1000,
/// ).unwrap();
/// assert_eq!(entry.function.as_str(), "transfer");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryFunction {
    /// The module containing the function.
    pub module: ModuleId,
    /// The function name.
    pub function: Identifier,
    /// Type arguments for generic functions.
    pub ty_args: Vec<TypeTag>,
    /// BCS-encoded arguments, one blob per argument.
    pub args: Vec<Vec<u8>>,
}

impl EntryFunction {
    /// Creates a new entry function payload.
    pub fn new(
        module: ModuleId,
        function: Identifier,
        ty_args: Vec<TypeTag>,
        args: Vec<Vec<u8>>,
    ) -> Self {
        Self {
            module,
            function,
            ty_args,
            args,
        }
    }

    /// Creates a simple APT transfer payload
    /// (`0x1::aptos_account::transfer`).
    pub fn apt_transfer(recipient: AccountAddress, amount: u64) -> AptosResult<Self> {
        Ok(Self {
            module: ModuleId::from_str_strict("0x1::aptos_account")?,
            function: Identifier::new("transfer")?,
            ty_args: vec![],
            args: vec![crate::bcs::to_bytes(&recipient)?, crate::bcs::to_bytes(&amount)?],
        })
    }

    /// Creates a coin transfer payload for any coin type
    /// (`0x1::coin::transfer<CoinType>`).
    pub fn coin_transfer(
        coin_type: TypeTag,
        recipient: AccountAddress,
        amount: u64,
    ) -> AptosResult<Self> {
        Ok(Self {
            module: ModuleId::from_str_strict("0x1::coin")?,
            function: Identifier::new("transfer")?,
            ty_args: vec![coin_type],
            args: vec![crate::bcs::to_bytes(&recipient)?, crate::bcs::to_bytes(&amount)?],
        })
    }
}

impl BcsSerialize for EntryFunction {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        self.module.serialize(serializer)?;
        self.function.serialize(serializer)?;
        self.ty_args.serialize(serializer)?;
        self.args.serialize(serializer)
    }
}

impl BcsDeserialize for EntryFunction {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            module: ModuleId::deserialize(deserializer)?,
            function: Identifier::deserialize(deserializer)?,
            ty_args: Vec::<TypeTag>::deserialize(deserializer)?,
            args: Vec::<Vec<u8>>::deserialize(deserializer)?,
        })
    }
}

impl From<EntryFunction> for TransactionPayload {
    fn from(entry_function: EntryFunction) -> Self {
        TransactionPayload::EntryFunction(entry_function)
    }
}

impl From<Script> for TransactionPayload {
    fn from(script: Script) -> Self {
        TransactionPayload::Script(script)
    }
}

/// An argument to a script payload.
///
/// This is the narrower legacy argument set; variant indices are fixed:
/// U8=0, U64=1, U128=2, Address=3, U8Vector=4, Bool=5.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionArgument {
    /// A u8 value (variant 0).
    U8(u8),
    /// A u64 value (variant 1).
    U64(u64),
    /// A u128 value (variant 2).
    U128(u128),
    /// An address value (variant 3).
    Address(AccountAddress),
    /// A vector of u8 (variant 4).
    U8Vector(Vec<u8>),
    /// A boolean value (variant 5).
    Bool(bool),
}

impl BcsSerialize for TransactionArgument {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        match self {
            TransactionArgument::U8(v) => {
                serializer.serialize_uleb128(0);
                serializer.serialize_u8(*v);
            }
            TransactionArgument::U64(v) => {
                serializer.serialize_uleb128(1);
                serializer.serialize_u64(*v);
            }
            TransactionArgument::U128(v) => {
                serializer.serialize_uleb128(2);
                serializer.serialize_u128(*v);
            }
            TransactionArgument::Address(v) => {
                serializer.serialize_uleb128(3);
                v.serialize(serializer)?;
            }
            TransactionArgument::U8Vector(v) => {
                serializer.serialize_uleb128(4);
                serializer.serialize_bytes(v);
            }
            TransactionArgument::Bool(v) => {
                serializer.serialize_uleb128(5);
                serializer.serialize_bool(*v);
            }
        }
        Ok(())
    }
}

impl BcsDeserialize for TransactionArgument {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        match deserializer.deserialize_uleb128()? {
            0 => Ok(Self::U8(deserializer.deserialize_u8()?)),
            1 => Ok(Self::U64(deserializer.deserialize_u64()?)),
            2 => Ok(Self::U128(deserializer.deserialize_u128()?)),
            3 => Ok(Self::Address(AccountAddress::deserialize(deserializer)?)),
            4 => Ok(Self::U8Vector(deserializer.deserialize_bytes()?)),
            5 => Ok(Self::Bool(deserializer.deserialize_bool()?)),
            v => Err(AptosError::Bcs(format!(
                "unknown TransactionArgument variant {v}"
            ))),
        }
    }
}
