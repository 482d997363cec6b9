//! Account address type.
//!
//! Aptos account addresses are 32-byte values, typically displayed as
//! 64 hexadecimal characters with a `0x` prefix.

use crate::bcs::{BcsDeserialize, BcsSerialize, Deserializer, Serializer};
use crate::error::{AptosError, AptosResult};
use std::fmt;
use std::str::FromStr;

/// The length of an account address in bytes.
pub const ADDRESS_LENGTH: usize = 32;

/// A 32-byte Aptos account address.
///
/// # Display Format
///
/// Addresses are displayed as 64 hexadecimal characters with a `0x`
/// prefix. Short addresses (like `0x1` for the core framework) are
/// zero-padded on the left when parsed and can be rendered back in
/// trimmed form with [`AccountAddress::to_short_string`].
///
/// # Example
///
/// ```rust
/// use aptos_transaction_builder::types::AccountAddress;
///
/// let addr = AccountAddress::from_hex("0x1").unwrap();
/// assert_eq!(
///     addr.to_string(),
///     "0x0000000000000000000000000000000000000000000000000000000000000001"
/// );
/// assert_eq!(addr.to_short_string(), "0x1");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountAddress([u8; ADDRESS_LENGTH]);

impl AccountAddress {
    /// The "zero" address (all zeros).
    pub const ZERO: Self = Self([0u8; ADDRESS_LENGTH]);

    /// The core framework address (0x1).
    pub const ONE: Self = {
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes[ADDRESS_LENGTH - 1] = 1;
        Self(bytes)
    };

    /// Creates an address from a byte array.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Creates an address from a hex string, with or without a `0x`
    /// prefix. Hex shorter than 32 bytes is left-padded with zeros.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, is not valid hex, or
    /// decodes to more than 32 bytes.
    pub fn from_hex<T: AsRef<str>>(hex_str: T) -> AptosResult<Self> {
        let hex_str = hex_str.as_ref();
        let hex_str = if let Some(stripped) =
            hex_str.strip_prefix("0x").or_else(|| hex_str.strip_prefix("0X"))
        {
            stripped
        } else {
            hex_str
        };

        if hex_str.is_empty() {
            return Err(AptosError::InvalidAddress(
                "address must contain at least one hex digit".to_string(),
            ));
        }
        if hex_str.len() > ADDRESS_LENGTH * 2 {
            return Err(AptosError::InvalidAddress(format!(
                "address too long: {} characters (max {})",
                hex_str.len(),
                ADDRESS_LENGTH * 2
            )));
        }

        // Zero-pad to the full width; this also evens out odd-length input
        let padded = format!("{:0>64}", hex_str);
        let bytes = hex::decode(&padded)?;

        let mut address = [0u8; ADDRESS_LENGTH];
        address.copy_from_slice(&bytes);
        Ok(Self(address))
    }

    /// Creates an address from a byte slice.
    pub fn from_bytes<T: AsRef<[u8]>>(bytes: T) -> AptosResult<Self> {
        let bytes = bytes.as_ref();
        if bytes.len() != ADDRESS_LENGTH {
            return Err(AptosError::InvalidAddress(format!(
                "expected {} bytes, got {}",
                ADDRESS_LENGTH,
                bytes.len()
            )));
        }
        let mut address = [0u8; ADDRESS_LENGTH];
        address.copy_from_slice(bytes);
        Ok(Self(address))
    }

    /// Returns the address as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the address as a byte array.
    pub fn to_bytes(&self) -> [u8; ADDRESS_LENGTH] {
        self.0
    }

    /// Returns the address as a full-width hex string with `0x` prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Returns a short hex string, trimming leading zeros.
    ///
    /// For example, `0x0000...0001` becomes `0x1`.
    pub fn to_short_string(&self) -> String {
        let hex = hex::encode(self.0);
        let trimmed = hex.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{}", trimmed)
        }
    }

    /// Returns true if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self == &Self::ZERO
    }
}

impl Default for AccountAddress {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({})", self.to_short_string())
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for AccountAddress {
    type Err = AptosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; ADDRESS_LENGTH]> for AccountAddress {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl From<AccountAddress> for [u8; ADDRESS_LENGTH] {
    fn from(addr: AccountAddress) -> Self {
        addr.0
    }
}

impl AsRef<[u8]> for AccountAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl BcsSerialize for AccountAddress {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        // Fixed-width field: no length prefix
        serializer.serialize_fixed_bytes(&self.0);
        Ok(())
    }
}

impl BcsDeserialize for AccountAddress {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        let bytes = deserializer.deserialize_fixed_bytes(ADDRESS_LENGTH)?;
        Self::from_bytes(bytes)
    }
}
