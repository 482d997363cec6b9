//! Move type system representations.
//!
//! The structural [`TypeTag`] tree is the closed variant set the chain's
//! wire format fixes; its enum indices are part of the cryptographic
//! contract and must never be reordered.

use crate::bcs::{BcsDeserialize, BcsSerialize, Deserializer, Serializer};
use crate::error::{AptosError, AptosResult};
use crate::types::AccountAddress;
use std::fmt;
use std::str::FromStr;

/// Maximum length for identifier strings.
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// An identifier in Move (module name, function name, struct name).
///
/// Identifiers must start with a letter or underscore and contain only
/// alphanumeric characters and underscores.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Creates a new identifier, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is empty, exceeds 128 characters,
    /// does not start with a letter or underscore, or contains characters
    /// that are not alphanumeric or underscore.
    pub fn new(s: impl Into<String>) -> AptosResult<Self> {
        let s = s.into();
        if s.len() > MAX_IDENTIFIER_LENGTH {
            return Err(AptosError::InvalidIdentifier(format!(
                "identifier too long: {} bytes (max {})",
                s.len(),
                MAX_IDENTIFIER_LENGTH
            )));
        }
        let Some(first) = s.chars().next() else {
            return Err(AptosError::InvalidIdentifier(
                "identifier cannot be empty".into(),
            ));
        };
        if !first.is_ascii_alphabetic() && first != '_' {
            return Err(AptosError::InvalidIdentifier(format!(
                "identifier must start with letter or underscore: {s}"
            )));
        }
        if !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(AptosError::InvalidIdentifier(format!(
                "identifier contains invalid characters: {s}"
            )));
        }
        Ok(Self(s))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Identifier {
    type Err = AptosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl BcsSerialize for Identifier {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.serialize_str(&self.0);
        Ok(())
    }
}

impl BcsDeserialize for Identifier {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Self::new(deserializer.deserialize_str()?)
    }
}

/// A Move module identifier (`address::module_name`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModuleId {
    /// The address where the module is published.
    pub address: AccountAddress,
    /// The name of the module.
    pub name: Identifier,
}

impl ModuleId {
    /// Creates a new module ID.
    pub fn new(address: AccountAddress, name: Identifier) -> Self {
        Self { address, name }
    }

    /// Parses a module ID from a string (e.g. `0x1::coin`).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not `address::module_name`, the
    /// address is invalid, or the module name is not a valid identifier.
    pub fn from_str_strict(s: &str) -> AptosResult<Self> {
        let parts: Vec<&str> = s.split("::").collect();
        if parts.len() != 2 {
            return Err(AptosError::Parse(format!("invalid module ID format: {s}")));
        }
        let address = AccountAddress::from_hex(parts[0])?;
        let name = Identifier::new(parts[1])?;
        Ok(Self { address, name })
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.address.to_short_string(), self.name)
    }
}

impl FromStr for ModuleId {
    type Err = AptosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_strict(s)
    }
}

impl BcsSerialize for ModuleId {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        self.address.serialize(serializer)?;
        self.name.serialize(serializer)
    }
}

impl BcsDeserialize for ModuleId {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            address: AccountAddress::deserialize(deserializer)?,
            name: Identifier::deserialize(deserializer)?,
        })
    }
}

/// A struct tag identifies a specific struct type in Move.
///
/// Textual format: `address::module::StructName<TypeArg1, TypeArg2, ...>`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StructTag {
    /// The address where the module is published.
    pub address: AccountAddress,
    /// The module name.
    pub module: Identifier,
    /// The struct name.
    pub name: Identifier,
    /// Type arguments (for generic structs).
    pub type_args: Vec<TypeTag>,
}

impl StructTag {
    /// Creates a new struct tag.
    pub fn new(
        address: AccountAddress,
        module: Identifier,
        name: Identifier,
        type_args: Vec<TypeTag>,
    ) -> Self {
        Self {
            address,
            module,
            name,
            type_args,
        }
    }

    /// Creates a struct tag with no type arguments.
    pub fn simple(
        address: AccountAddress,
        module: impl Into<String>,
        name: impl Into<String>,
    ) -> AptosResult<Self> {
        Ok(Self {
            address,
            module: Identifier::new(module)?,
            name: Identifier::new(name)?,
            type_args: vec![],
        })
    }

    /// Returns the short-address form `0x1::module::Name`, ignoring any
    /// type arguments. Used to recognize pseudo-primitives like
    /// `0x1::string::String`.
    pub fn short_name(&self) -> String {
        format!(
            "{}::{}::{}",
            self.address.to_short_string(),
            self.module,
            self.name
        )
    }

    /// Returns true if this is the `0x1::string::String` pseudo-primitive.
    pub fn is_string(&self) -> bool {
        self.short_name() == "0x1::string::String"
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())?;
        if !self.type_args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.type_args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

impl BcsSerialize for StructTag {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        self.address.serialize(serializer)?;
        self.module.serialize(serializer)?;
        self.name.serialize(serializer)?;
        self.type_args.serialize(serializer)
    }
}

impl BcsDeserialize for StructTag {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            address: AccountAddress::deserialize(deserializer)?,
            module: Identifier::deserialize(deserializer)?,
            name: Identifier::deserialize(deserializer)?,
            type_args: Vec::<TypeTag>::deserialize(deserializer)?,
        })
    }
}

/// A type tag represents a Move type.
///
/// Variant indices are fixed by the chain's canonical format and must not
/// change:
///
/// - 0: Bool
/// - 1: U8
/// - 2: U64
/// - 3: U128
/// - 4: Address
/// - 5: Signer
/// - 6: Vector
/// - 7: Struct
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Boolean type (variant 0)
    Bool,
    /// 8-bit unsigned integer (variant 1)
    U8,
    /// 64-bit unsigned integer (variant 2)
    U64,
    /// 128-bit unsigned integer (variant 3)
    U128,
    /// Address type (variant 4)
    Address,
    /// Signer type (variant 5, only valid as an implicit parameter)
    Signer,
    /// Vector type with element type (variant 6)
    Vector(Box<TypeTag>),
    /// Struct type (variant 7)
    Struct(Box<StructTag>),
}

impl TypeTag {
    /// Creates a vector type tag with the given element type.
    pub fn vector(element: TypeTag) -> Self {
        Self::Vector(Box::new(element))
    }

    /// Creates a struct type tag.
    pub fn struct_tag(tag: StructTag) -> Self {
        Self::Struct(Box::new(tag))
    }

    /// The `AptosCoin` type tag (`0x1::aptos_coin::AptosCoin`).
    pub fn aptos_coin() -> Self {
        Self::Struct(Box::new(
            StructTag::simple(AccountAddress::ONE, "aptos_coin", "AptosCoin")
                .expect("static identifiers are valid"),
        ))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::U8 => write!(f, "u8"),
            TypeTag::U64 => write!(f, "u64"),
            TypeTag::U128 => write!(f, "u128"),
            TypeTag::Address => write!(f, "address"),
            TypeTag::Signer => write!(f, "signer"),
            TypeTag::Vector(inner) => write!(f, "vector<{inner}>"),
            TypeTag::Struct(tag) => write!(f, "{tag}"),
        }
    }
}

impl FromStr for TypeTag {
    type Err = AptosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::types::parse_type_tag(s)
    }
}

impl BcsSerialize for TypeTag {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        match self {
            TypeTag::Bool => serializer.serialize_uleb128(0),
            TypeTag::U8 => serializer.serialize_uleb128(1),
            TypeTag::U64 => serializer.serialize_uleb128(2),
            TypeTag::U128 => serializer.serialize_uleb128(3),
            TypeTag::Address => serializer.serialize_uleb128(4),
            TypeTag::Signer => serializer.serialize_uleb128(5),
            TypeTag::Vector(inner) => {
                serializer.serialize_uleb128(6);
                return inner.serialize(serializer);
            }
            TypeTag::Struct(tag) => {
                serializer.serialize_uleb128(7);
                return tag.serialize(serializer);
            }
        }
        Ok(())
    }
}

impl BcsDeserialize for TypeTag {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        match deserializer.deserialize_uleb128()? {
            0 => Ok(TypeTag::Bool),
            1 => Ok(TypeTag::U8),
            2 => Ok(TypeTag::U64),
            3 => Ok(TypeTag::U128),
            4 => Ok(TypeTag::Address),
            5 => Ok(TypeTag::Signer),
            6 => Ok(TypeTag::Vector(Box::new(TypeTag::deserialize(
                deserializer,
            )?))),
            7 => Ok(TypeTag::Struct(Box::new(StructTag::deserialize(
                deserializer,
            )?))),
            v => Err(AptosError::Bcs(format!("unknown TypeTag variant {v}"))),
        }
    }
}
