//! Dynamic argument coercion.
//!
//! Call arguments arrive loosely typed (native values, decimal strings,
//! JSON) and must be coerced into the exact binary form a parameter's
//! [`TypeTag`] demands. The accepted source representations per target
//! type form a closed table:
//!
//! | target | accepted sources |
//! |---|---|
//! | `bool` | native bool |
//! | `u8`, `u64` | in-range integers, integral floats, decimal strings |
//! | `u128` | u128, in-range natives, big integers, decimal strings |
//! | `address` | address value, 32-byte blob, hex string |
//! | `vector<u8>` | raw bytes, UTF-8 string |
//! | `vector<T>` | any ordered sequence, elements coerced recursively |
//! | `0x1::string::String` | native string |
//!
//! Every other struct fails, and `signer` always fails (it is an implicit
//! parameter the chain injects).

use crate::bcs::Serializer;
use crate::error::{AptosError, AptosResult};
use crate::transaction::payload::TransactionArgument;
use crate::types::{AccountAddress, TypeTag};
use num_bigint::{BigInt, Sign};

/// A loosely-typed call argument awaiting coercion.
///
/// This is the closed set of source representations the coercion table
/// dispatches over; anything else must be converted into one of these
/// before building a payload.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgValue {
    /// A native boolean.
    Bool(bool),
    /// A native u8.
    U8(u8),
    /// A native unsigned integer.
    U64(u64),
    /// A native u128.
    U128(u128),
    /// A native signed integer (JSON numbers may arrive signed).
    I64(i64),
    /// A floating-point number; only integral values coerce.
    F64(f64),
    /// An arbitrary-precision integer.
    BigInt(BigInt),
    /// A string: decimal digits, hex, or UTF-8 payload depending on the
    /// target type.
    Str(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// An account address.
    Address(AccountAddress),
    /// An ordered sequence of further arguments.
    Vector(Vec<ArgValue>),
}

impl ArgValue {
    /// Converts a JSON value into an argument.
    ///
    /// Numbers map to the narrowest native representation that holds
    /// them; arrays recurse. Objects and nulls are not valid arguments.
    pub fn from_json(value: &serde_json::Value) -> AptosResult<Self> {
        match value {
            serde_json::Value::Bool(b) => Ok(Self::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Ok(Self::U64(u))
                } else if let Some(i) = n.as_i64() {
                    Ok(Self::I64(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Self::F64(f))
                } else {
                    n.to_string()
                        .parse::<BigInt>()
                        .map(Self::BigInt)
                        .map_err(|_| {
                            AptosError::TypeMismatch(format!("unrepresentable number {n}"))
                        })
                }
            }
            serde_json::Value::String(s) => Ok(Self::Str(s.clone())),
            serde_json::Value::Array(items) => Ok(Self::Vector(
                items.iter().map(Self::from_json).collect::<AptosResult<_>>()?,
            )),
            serde_json::Value::Null => {
                Err(AptosError::TypeMismatch("null is not a valid argument".into()))
            }
            serde_json::Value::Object(_) => Err(AptosError::TypeMismatch(
                "objects are not valid arguments".into(),
            )),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ArgValue::Bool(_) => "bool",
            ArgValue::U8(_) => "u8",
            ArgValue::U64(_) => "u64",
            ArgValue::U128(_) => "u128",
            ArgValue::I64(_) => "i64",
            ArgValue::F64(_) => "f64",
            ArgValue::BigInt(_) => "bigint",
            ArgValue::Str(_) => "string",
            ArgValue::Bytes(_) => "bytes",
            ArgValue::Address(_) => "address",
            ArgValue::Vector(_) => "vector",
        }
    }
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<u8> for ArgValue {
    fn from(v: u8) -> Self {
        Self::U8(v)
    }
}

impl From<u64> for ArgValue {
    fn from(v: u64) -> Self {
        Self::U64(v)
    }
}

impl From<u128> for ArgValue {
    fn from(v: u128) -> Self {
        Self::U128(v)
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<f64> for ArgValue {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<BigInt> for ArgValue {
    fn from(v: BigInt) -> Self {
        Self::BigInt(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<u8>> for ArgValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<AccountAddress> for ArgValue {
    fn from(v: AccountAddress) -> Self {
        Self::Address(v)
    }
}

impl From<Vec<ArgValue>> for ArgValue {
    fn from(v: Vec<ArgValue>) -> Self {
        Self::Vector(v)
    }
}

fn mismatch(value: &ArgValue, target: &TypeTag) -> AptosError {
    AptosError::TypeMismatch(format!(
        "cannot coerce {} value to {}",
        value.kind(),
        target
    ))
}

/// Integral-float extraction: accepts only whole, non-negative values.
fn integral(f: f64) -> Option<u64> {
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

fn bigint_to_u128(value: &BigInt) -> Option<u128> {
    if value.sign() == Sign::Minus {
        return None;
    }
    let (_, bytes) = value.to_bytes_le();
    if bytes.len() > 16 {
        return None;
    }
    let mut le = [0u8; 16];
    le[..bytes.len()].copy_from_slice(&bytes);
    Some(u128::from_le_bytes(le))
}

/// Encodes one argument value against its parameter type, appending the
/// exact canonical bytes to the serializer.
///
/// # Errors
///
/// [`AptosError::TypeMismatch`] when the value's representation is not in
/// the accepted set for the target, [`AptosError::EncodingOverflow`] when
/// a numeric value exceeds the field width, and
/// [`AptosError::UnsupportedType`] for `signer` and non-string struct
/// targets.
pub fn encode_arg(
    value: &ArgValue,
    target: &TypeTag,
    serializer: &mut Serializer,
) -> AptosResult<()> {
    match target {
        TypeTag::Bool => {
            if let ArgValue::Bool(v) = value {
                serializer.serialize_bool(*v);
                return Ok(());
            }
        }
        TypeTag::U8 => {
            let parsed = match value {
                ArgValue::U8(v) => Some(*v),
                ArgValue::U64(v) => u8::try_from(*v).ok(),
                ArgValue::I64(v) => u8::try_from(*v).ok(),
                ArgValue::F64(f) => integral(*f).and_then(|v| u8::try_from(v).ok()),
                ArgValue::Str(s) => Some(
                    s.parse::<u8>()
                        .map_err(|_| mismatch(value, target))?,
                ),
                _ => None,
            };
            if let Some(v) = parsed {
                serializer.serialize_u8(v);
                return Ok(());
            }
        }
        TypeTag::U64 => {
            let parsed = match value {
                ArgValue::U64(v) => Some(*v),
                ArgValue::U8(v) => Some(u64::from(*v)),
                ArgValue::I64(v) => u64::try_from(*v).ok(),
                ArgValue::F64(f) => integral(*f),
                ArgValue::Str(s) => Some(
                    s.parse::<u64>()
                        .map_err(|_| mismatch(value, target))?,
                ),
                _ => None,
            };
            if let Some(v) = parsed {
                serializer.serialize_u64(v);
                return Ok(());
            }
        }
        TypeTag::U128 => {
            match value {
                ArgValue::U128(v) => {
                    serializer.serialize_u128(*v);
                    return Ok(());
                }
                ArgValue::U64(v) => {
                    serializer.serialize_u128(u128::from(*v));
                    return Ok(());
                }
                ArgValue::U8(v) => {
                    serializer.serialize_u128(u128::from(*v));
                    return Ok(());
                }
                ArgValue::I64(v) => {
                    if let Ok(v) = u128::try_from(*v) {
                        serializer.serialize_u128(v);
                        return Ok(());
                    }
                }
                ArgValue::F64(f) => {
                    if let Some(v) = integral(*f) {
                        serializer.serialize_u128(u128::from(v));
                        return Ok(());
                    }
                }
                ArgValue::BigInt(big) => {
                    return serializer.serialize_u128_from_bigint(big);
                }
                ArgValue::Str(s) => {
                    let big = s
                        .parse::<BigInt>()
                        .map_err(|_| mismatch(value, target))?;
                    return serializer.serialize_u128_from_bigint(&big);
                }
                _ => {}
            }
        }
        TypeTag::Address => {
            match value {
                ArgValue::Address(addr) => {
                    serializer.serialize_fixed_bytes(addr.as_bytes());
                    return Ok(());
                }
                ArgValue::Str(s) => {
                    let addr = AccountAddress::from_hex(s)?;
                    serializer.serialize_fixed_bytes(addr.as_bytes());
                    return Ok(());
                }
                ArgValue::Bytes(bytes) => {
                    let addr = AccountAddress::from_bytes(bytes)?;
                    serializer.serialize_fixed_bytes(addr.as_bytes());
                    return Ok(());
                }
                _ => {}
            }
        }
        TypeTag::Vector(item_type) => {
            // vector<u8> additionally accepts raw bytes and UTF-8 strings
            if **item_type == TypeTag::U8 {
                match value {
                    ArgValue::Bytes(bytes) => {
                        serializer.serialize_bytes(bytes);
                        return Ok(());
                    }
                    ArgValue::Str(s) => {
                        serializer.serialize_str(s);
                        return Ok(());
                    }
                    _ => {}
                }
            }
            if let ArgValue::Vector(items) = value {
                serializer.serialize_uleb128(items.len() as u64);
                for item in items {
                    encode_arg(item, item_type, serializer)?;
                }
                return Ok(());
            }
        }
        TypeTag::Struct(tag) => {
            if !tag.is_string() {
                return Err(AptosError::UnsupportedType(format!(
                    "the only supported struct argument type is 0x1::string::String, got {}",
                    tag.short_name()
                )));
            }
            if let ArgValue::Str(s) = value {
                serializer.serialize_str(s);
                return Ok(());
            }
        }
        TypeTag::Signer => {
            return Err(AptosError::UnsupportedType(
                "signer arguments are implicit and cannot be supplied".into(),
            ));
        }
    }
    Err(mismatch(value, target))
}

/// Coerces one value into the legacy [`TransactionArgument`] enum used by
/// script payloads.
///
/// This path is narrower than [`encode_arg`]: only exact-type matches are
/// accepted, and `signer`/struct targets always fail.
pub fn to_transaction_argument(
    value: &ArgValue,
    target: &TypeTag,
) -> AptosResult<TransactionArgument> {
    match target {
        TypeTag::Bool => {
            if let ArgValue::Bool(v) = value {
                return Ok(TransactionArgument::Bool(*v));
            }
        }
        TypeTag::U8 => {
            if let ArgValue::U8(v) = value {
                return Ok(TransactionArgument::U8(*v));
            }
        }
        TypeTag::U64 => {
            if let ArgValue::U64(v) = value {
                return Ok(TransactionArgument::U64(*v));
            }
        }
        TypeTag::U128 => match value {
            ArgValue::U128(v) => return Ok(TransactionArgument::U128(*v)),
            ArgValue::BigInt(big) => {
                let v = bigint_to_u128(big).ok_or_else(|| {
                    AptosError::EncodingOverflow(format!("{big} does not fit in u128"))
                })?;
                return Ok(TransactionArgument::U128(v));
            }
            _ => {}
        },
        TypeTag::Address => match value {
            ArgValue::Address(addr) => return Ok(TransactionArgument::Address(*addr)),
            ArgValue::Str(s) => {
                if let Ok(addr) = AccountAddress::from_hex(s) {
                    return Ok(TransactionArgument::Address(addr));
                }
            }
            _ => {}
        },
        TypeTag::Vector(item_type) => {
            if **item_type == TypeTag::U8 {
                if let ArgValue::Bytes(bytes) = value {
                    return Ok(TransactionArgument::U8Vector(bytes.clone()));
                }
            } else {
                return Err(AptosError::UnsupportedType(format!(
                    "no TransactionArgument variant for {target}"
                )));
            }
        }
        TypeTag::Signer | TypeTag::Struct(_) => {
            return Err(AptosError::UnsupportedType(format!(
                "no TransactionArgument variant for {target}"
            )));
        }
    }
    Err(mismatch(value, target))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: ArgValue, target: &TypeTag) -> AptosResult<Vec<u8>> {
        let mut serializer = Serializer::new();
        encode_arg(&value, target, &mut serializer)?;
        Ok(serializer.into_bytes())
    }

    #[test]
    fn test_bool_only_accepts_bool() {
        assert_eq!(encode(true.into(), &TypeTag::Bool).unwrap(), vec![1]);
        assert!(encode(1u64.into(), &TypeTag::Bool).is_err());
        assert!(encode("true".into(), &TypeTag::Bool).is_err());
    }

    #[test]
    fn test_u64_from_string_and_native_agree() {
        let from_str = encode("100".into(), &TypeTag::U64).unwrap();
        let from_native = encode(100u64.into(), &TypeTag::U64).unwrap();
        assert_eq!(from_str, from_native);
        assert_eq!(from_str, 100u64.to_le_bytes().to_vec());
    }

    #[test]
    fn test_u8_range_checks() {
        assert_eq!(encode(255u64.into(), &TypeTag::U8).unwrap(), vec![255]);
        assert!(encode(256u64.into(), &TypeTag::U8).is_err());
        assert!(encode((-1i64).into(), &TypeTag::U8).is_err());
        assert!(encode("300".into(), &TypeTag::U8).is_err());
    }

    #[test]
    fn test_integral_floats() {
        assert_eq!(
            encode(5.0f64.into(), &TypeTag::U64).unwrap(),
            5u64.to_le_bytes().to_vec()
        );
        assert!(encode(5.5f64.into(), &TypeTag::U64).is_err());
        assert!(encode((-2.0f64).into(), &TypeTag::U64).is_err());
    }

    #[test]
    fn test_u128_sources() {
        let expected = 1u128.to_le_bytes().to_vec();
        assert_eq!(encode(1u128.into(), &TypeTag::U128).unwrap(), expected);
        assert_eq!(encode(1u64.into(), &TypeTag::U128).unwrap(), expected);
        assert_eq!(encode("1".into(), &TypeTag::U128).unwrap(), expected);
        assert_eq!(
            encode(BigInt::from(1).into(), &TypeTag::U128).unwrap(),
            expected
        );

        // max value is sixteen 0xff bytes
        let max = "340282366920938463463374607431768211455";
        assert_eq!(encode(max.into(), &TypeTag::U128).unwrap(), vec![0xff; 16]);
    }

    #[test]
    fn test_u128_rejects_negative_and_overflow() {
        assert!(matches!(
            encode(BigInt::from(-1).into(), &TypeTag::U128),
            Err(AptosError::EncodingOverflow(_))
        ));
        assert!(matches!(
            encode("-1".into(), &TypeTag::U128),
            Err(AptosError::EncodingOverflow(_))
        ));
        // 2^128 overflows
        let too_big = "340282366920938463463374607431768211456";
        assert!(encode(too_big.into(), &TypeTag::U128).is_err());
    }

    #[test]
    fn test_address_sources() {
        let addr = AccountAddress::from_hex("0x22").unwrap();
        let expected = addr.to_bytes().to_vec();
        assert_eq!(encode(addr.into(), &TypeTag::Address).unwrap(), expected);
        assert_eq!(encode("0x22".into(), &TypeTag::Address).unwrap(), expected);
        assert_eq!(
            encode(addr.to_bytes().to_vec().into(), &TypeTag::Address).unwrap(),
            expected
        );
    }

    #[test]
    fn test_address_rejections() {
        assert!(encode((-1i64).into(), &TypeTag::Address).is_err());
        // longer than 32 bytes
        let long = format!("0x{}", "ff".repeat(33));
        assert!(encode(long.as_str().into(), &TypeTag::Address).is_err());
        // 31-byte blob
        assert!(encode(vec![0u8; 31].into(), &TypeTag::Address).is_err());
    }

    #[test]
    fn test_vector_u8_accepts_bytes_and_strings() {
        let tag = TypeTag::vector(TypeTag::U8);
        assert_eq!(
            encode(vec![1u8, 2, 3].into(), &tag).unwrap(),
            vec![3, 1, 2, 3]
        );
        // UTF-8 strings convert implicitly
        assert_eq!(
            encode("ab".into(), &tag).unwrap(),
            vec![2, b'a', b'b']
        );
    }

    #[test]
    fn test_vector_recursive_coercion() {
        let tag = TypeTag::vector(TypeTag::U64);
        let value = ArgValue::Vector(vec!["100".into(), 200u64.into()]);
        let bytes = encode(value, &tag).unwrap();

        let mut expected = vec![2u8];
        expected.extend_from_slice(&100u64.to_le_bytes());
        expected.extend_from_slice(&200u64.to_le_bytes());
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_vector_rejects_scalars() {
        let tag = TypeTag::vector(TypeTag::U64);
        assert!(encode(7u64.into(), &tag).is_err());
    }

    #[test]
    fn test_string_pseudo_struct() {
        let tag = crate::types::parse_type_tag("0x1::string::String").unwrap();
        assert_eq!(encode("hi".into(), &tag).unwrap(), vec![2, b'h', b'i']);
        assert!(encode(1u64.into(), &tag).is_err());
    }

    #[test]
    fn test_other_structs_unsupported() {
        let tag = crate::types::parse_type_tag("0x1::coin::CoinInfo").unwrap();
        assert!(matches!(
            encode("x".into(), &tag),
            Err(AptosError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_signer_unsupported() {
        assert!(matches!(
            encode(1u64.into(), &TypeTag::Signer),
            Err(AptosError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::json!([true, 5, "text", [1, 2]]);
        let value = ArgValue::from_json(&json).unwrap();
        let ArgValue::Vector(items) = value else {
            panic!("expected vector");
        };
        assert_eq!(items[0], ArgValue::Bool(true));
        assert_eq!(items[1], ArgValue::U64(5));
        assert_eq!(items[2], ArgValue::Str("text".into()));
        assert_eq!(
            items[3],
            ArgValue::Vector(vec![ArgValue::U64(1), ArgValue::U64(2)])
        );

        assert!(ArgValue::from_json(&serde_json::json!(null)).is_err());
        assert!(ArgValue::from_json(&serde_json::json!({"a": 1})).is_err());
    }

    #[test]
    fn test_transaction_argument_exact_matches() {
        assert_eq!(
            to_transaction_argument(&true.into(), &TypeTag::Bool).unwrap(),
            TransactionArgument::Bool(true)
        );
        assert_eq!(
            to_transaction_argument(&ArgValue::U8(9), &TypeTag::U8).unwrap(),
            TransactionArgument::U8(9)
        );
        assert_eq!(
            to_transaction_argument(&100u64.into(), &TypeTag::U64).unwrap(),
            TransactionArgument::U64(100)
        );
        assert_eq!(
            to_transaction_argument(&7u128.into(), &TypeTag::U128).unwrap(),
            TransactionArgument::U128(7)
        );
        assert_eq!(
            to_transaction_argument(&vec![1u8, 2].into(), &TypeTag::vector(TypeTag::U8)).unwrap(),
            TransactionArgument::U8Vector(vec![1, 2])
        );
        assert_eq!(
            to_transaction_argument(&"0x1".into(), &TypeTag::Address).unwrap(),
            TransactionArgument::Address(AccountAddress::ONE)
        );
    }

    #[test]
    fn test_transaction_argument_no_widening() {
        // The legacy path refuses the string-to-int conversions the
        // entry-function path performs.
        assert!(to_transaction_argument(&"100".into(), &TypeTag::U64).is_err());
        assert!(to_transaction_argument(&100u64.into(), &TypeTag::U8).is_err());
    }

    #[test]
    fn test_transaction_argument_signer_and_struct_fail() {
        let string_tag = crate::types::parse_type_tag("0x1::string::String").unwrap();
        assert!(to_transaction_argument(&"s".into(), &string_tag).is_err());
        assert!(to_transaction_argument(&1u64.into(), &TypeTag::Signer).is_err());
    }
}
