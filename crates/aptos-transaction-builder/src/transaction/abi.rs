//! ABI-driven payload building.
//!
//! An ABI blob is the BCS encoding of a [`ScriptABI`]: either a
//! transaction script (inline bytecode plus parameter list) or an entry
//! function reference. A builder indexes decoded ABIs by name and turns
//! loosely-typed argument lists into fully-encoded payloads.

use crate::bcs::{BcsDeserialize, BcsSerialize, Deserializer, Serializer};
use crate::error::{AptosError, AptosResult};
use crate::transaction::coerce::{encode_arg, to_transaction_argument, ArgValue};
use crate::transaction::payload::{EntryFunction, Script, TransactionPayload};
use crate::types::{parse_type_tag, AccountAddress, Identifier, ModuleId, TypeTag};
use std::collections::HashMap;

/// A generic type parameter declared by an ABI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeArgumentABI {
    /// The parameter name (or its positional index rendered as text).
    pub name: String,
}

/// One function parameter: a name and its structural type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArgumentABI {
    /// The parameter name.
    pub name: String,
    /// The parameter type.
    pub type_tag: TypeTag,
}

impl BcsSerialize for TypeArgumentABI {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.serialize_str(&self.name);
        Ok(())
    }
}

impl BcsDeserialize for TypeArgumentABI {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            name: deserializer.deserialize_str()?,
        })
    }
}

impl BcsSerialize for ArgumentABI {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.serialize_str(&self.name);
        self.type_tag.serialize(serializer)
    }
}

impl BcsDeserialize for ArgumentABI {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            name: deserializer.deserialize_str()?,
            type_tag: TypeTag::deserialize(deserializer)?,
        })
    }
}

/// The ABI of a transaction script with inline bytecode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionScriptABI {
    /// The script name, used as its lookup key.
    pub name: String,
    /// Doc comment carried in the blob.
    pub doc: String,
    /// The compiled script bytecode.
    pub code: Vec<u8>,
    /// Generic type parameters.
    pub ty_args: Vec<TypeArgumentABI>,
    /// Declared parameters.
    pub args: Vec<ArgumentABI>,
}

/// The ABI of an entry function on a published module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryFunctionABI {
    /// The function name.
    pub name: String,
    /// The module the function lives in.
    pub module_name: ModuleId,
    /// Doc comment carried in the blob.
    pub doc: String,
    /// Generic type parameters.
    pub ty_args: Vec<TypeArgumentABI>,
    /// Declared parameters.
    pub args: Vec<ArgumentABI>,
}

impl BcsSerialize for TransactionScriptABI {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.serialize_str(&self.name);
        serializer.serialize_str(&self.doc);
        serializer.serialize_bytes(&self.code);
        self.ty_args.serialize(serializer)?;
        self.args.serialize(serializer)
    }
}

impl BcsDeserialize for TransactionScriptABI {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            name: deserializer.deserialize_str()?,
            doc: deserializer.deserialize_str()?,
            code: deserializer.deserialize_bytes()?,
            ty_args: Vec::<TypeArgumentABI>::deserialize(deserializer)?,
            args: Vec::<ArgumentABI>::deserialize(deserializer)?,
        })
    }
}

impl BcsSerialize for EntryFunctionABI {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        serializer.serialize_str(&self.name);
        self.module_name.serialize(serializer)?;
        serializer.serialize_str(&self.doc);
        self.ty_args.serialize(serializer)?;
        self.args.serialize(serializer)
    }
}

impl BcsDeserialize for EntryFunctionABI {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        Ok(Self {
            name: deserializer.deserialize_str()?,
            module_name: ModuleId::deserialize(deserializer)?,
            doc: deserializer.deserialize_str()?,
            ty_args: Vec::<TypeArgumentABI>::deserialize(deserializer)?,
            args: Vec::<ArgumentABI>::deserialize(deserializer)?,
        })
    }
}

/// A callable's ABI. Variant indices: TransactionScript=0,
/// EntryFunction=1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptABI {
    /// A transaction script ABI (variant 0).
    TransactionScript(TransactionScriptABI),
    /// An entry function ABI (variant 1).
    EntryFunction(EntryFunctionABI),
}

impl ScriptABI {
    /// Returns the key this ABI is indexed under: bare name for scripts,
    /// `short_addr::module::function` for entry functions.
    pub fn key(&self) -> String {
        match self {
            ScriptABI::TransactionScript(script) => script.name.clone(),
            ScriptABI::EntryFunction(entry) => {
                format!("{}::{}", entry.module_name, entry.name)
            }
        }
    }
}

impl BcsSerialize for ScriptABI {
    fn serialize(&self, serializer: &mut Serializer) -> AptosResult<()> {
        match self {
            ScriptABI::TransactionScript(script) => {
                serializer.serialize_uleb128(0);
                script.serialize(serializer)
            }
            ScriptABI::EntryFunction(entry) => {
                serializer.serialize_uleb128(1);
                entry.serialize(serializer)
            }
        }
    }
}

impl BcsDeserialize for ScriptABI {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> AptosResult<Self> {
        match deserializer.deserialize_uleb128()? {
            0 => Ok(Self::TransactionScript(TransactionScriptABI::deserialize(
                deserializer,
            )?)),
            1 => Ok(Self::EntryFunction(EntryFunctionABI::deserialize(
                deserializer,
            )?)),
            v => Err(AptosError::Bcs(format!("unknown ScriptABI variant {v}"))),
        }
    }
}

/// Normalizes a lookup key: `addr::module::function` strings are
/// rewritten with the short address form, script names pass through.
fn normalize_key(function: &str) -> AptosResult<String> {
    if !function.contains("::") {
        return Ok(function.to_string());
    }
    let parts: Vec<&str> = function.split("::").collect();
    if parts.len() != 3 {
        return Err(AptosError::Parse(format!(
            "invalid function name `{function}`"
        )));
    }
    let address = AccountAddress::from_hex(parts[0])?;
    let module = Identifier::new(parts[1])?;
    let name = Identifier::new(parts[2])?;
    Ok(format!(
        "{}::{}::{}",
        address.to_short_string(),
        module,
        name
    ))
}

/// Builds transaction payloads from a pre-supplied set of ABIs.
///
/// The index is constructed once and never mutated afterwards, so a
/// builder can be shared across threads freely; registering more ABIs
/// means constructing a new builder.
///
/// # Example
///
/// ```rust,ignore
/// let builder = AbiPayloadBuilder::new(&abi_blobs)?;
/// let payload = builder.build_transaction_payload(
///     "0x1::coin::transfer",
///     &["0x1::aptos_coin::AptosCoin".to_string()],
///     vec!["0x22".into(), "100".into()],
/// )?;
/// ```
#[derive(Debug, Clone)]
pub struct AbiPayloadBuilder {
    abi_map: HashMap<String, ScriptABI>,
}

impl AbiPayloadBuilder {
    /// Creates a builder by BCS-decoding raw ABI blobs.
    ///
    /// # Errors
    ///
    /// Fails if a blob does not decode as a [`ScriptABI`], or two blobs
    /// share a lookup key ([`AptosError::ConflictingAbi`]).
    pub fn new(abis: &[Vec<u8>]) -> AptosResult<Self> {
        let decoded = abis
            .iter()
            .map(|bytes| crate::bcs::from_bytes::<ScriptABI>(bytes))
            .collect::<AptosResult<Vec<_>>>()?;
        Self::from_abis(decoded)
    }

    /// Creates a builder from already-decoded ABIs.
    pub fn from_abis(abis: Vec<ScriptABI>) -> AptosResult<Self> {
        let mut abi_map = HashMap::with_capacity(abis.len());
        for abi in abis {
            let key = abi.key();
            if abi_map.contains_key(&key) {
                return Err(AptosError::ConflictingAbi(key));
            }
            abi_map.insert(key, abi);
        }
        Ok(Self { abi_map })
    }

    /// Returns true if an ABI is registered under the (normalized) key.
    pub fn contains(&self, function: &str) -> bool {
        normalize_key(function)
            .map(|key| self.abi_map.contains_key(&key))
            .unwrap_or(false)
    }

    /// Builds a payload for `function` with the given textual type
    /// arguments and loosely-typed argument values.
    ///
    /// Leading `signer` parameters are implicit (the chain injects them)
    /// and are dropped before the arity check. Entry-function arguments
    /// are each independently BCS-encoded into their own blob; script
    /// arguments become [`TransactionArgument`]s.
    ///
    /// [`TransactionArgument`]: crate::transaction::TransactionArgument
    pub fn build_transaction_payload(
        &self,
        function: &str,
        ty_tags: &[String],
        args: Vec<ArgValue>,
    ) -> AptosResult<TransactionPayload> {
        let key = normalize_key(function)?;
        let abi = self
            .abi_map
            .get(&key)
            .ok_or_else(|| AptosError::NotFound(key.clone()))?;

        let type_tags = ty_tags
            .iter()
            .map(|s| parse_type_tag(s))
            .collect::<AptosResult<Vec<_>>>()?;

        match abi {
            ScriptABI::EntryFunction(func_abi) => {
                let params = strip_leading_signers(&func_abi.args);
                check_arity(params.len(), args.len())?;

                let mut blobs = Vec::with_capacity(args.len());
                for (param, arg) in params.iter().zip(&args) {
                    let mut serializer = Serializer::new();
                    encode_arg(arg, &param.type_tag, &mut serializer)?;
                    blobs.push(serializer.into_bytes());
                }

                Ok(TransactionPayload::EntryFunction(EntryFunction::new(
                    func_abi.module_name.clone(),
                    Identifier::new(&func_abi.name)?,
                    type_tags,
                    blobs,
                )))
            }
            ScriptABI::TransactionScript(script_abi) => {
                let params = strip_leading_signers(&script_abi.args);
                check_arity(params.len(), args.len())?;

                let script_args = params
                    .iter()
                    .zip(&args)
                    .map(|(param, arg)| to_transaction_argument(arg, &param.type_tag))
                    .collect::<AptosResult<Vec<_>>>()?;

                Ok(TransactionPayload::Script(Script::new(
                    script_abi.code.clone(),
                    type_tags,
                    script_args,
                )))
            }
        }
    }
}

/// Drops the leading run of implicit `signer` parameters.
fn strip_leading_signers(args: &[ArgumentABI]) -> &[ArgumentABI] {
    let skip = args
        .iter()
        .take_while(|abi| abi.type_tag == TypeTag::Signer)
        .count();
    &args[skip..]
}

fn check_arity(expected: usize, provided: usize) -> AptosResult<()> {
    if expected != provided {
        return Err(AptosError::ArityMismatch { expected, provided });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcs;

    // Entry-function ABI blobs for a deployed red-packet contract.
    const RED_PACKET_CREATE_ABI: &str = "0106637265617465b39c45e31d1429218aeb3590e2a046edae9303fbbc3ef6a065384569cfd818810a7265645f7061636b657400000205636f756e74020d746f74616c5f62616c616e636502";
    const RED_PACKET_OPEN_ABI: &str = "01046f70656eb39c45e31d1429218aeb3590e2a046edae9303fbbc3ef6a065384569cfd818810a7265645f7061636b6574000003026964020e6c75636b795f6163636f756e747306040862616c616e6365730602";
    const RED_PACKET_CLOSE_ABI: &str = "0105636c6f7365b39c45e31d1429218aeb3590e2a046edae9303fbbc3ef6a065384569cfd818810a7265645f7061636b657400000102696402";

    const RED_PACKET_ADDRESS: &str =
        "0xb39c45e31d1429218aeb3590e2a046edae9303fbbc3ef6a065384569cfd81881";

    fn red_packet_builder() -> AbiPayloadBuilder {
        let blobs: Vec<Vec<u8>> = [
            RED_PACKET_CREATE_ABI,
            RED_PACKET_OPEN_ABI,
            RED_PACKET_CLOSE_ABI,
        ]
        .iter()
        .map(|s| hex::decode(s).unwrap())
        .collect();
        AbiPayloadBuilder::new(&blobs).unwrap()
    }

    #[test]
    fn test_decode_entry_function_abi() {
        let bytes = hex::decode(RED_PACKET_CREATE_ABI).unwrap();
        let abi: ScriptABI = bcs::from_bytes(&bytes).unwrap();
        let ScriptABI::EntryFunction(func) = abi else {
            panic!("expected entry function ABI");
        };
        assert_eq!(func.name, "create");
        assert_eq!(func.module_name.name.as_str(), "red_packet");
        assert_eq!(
            func.module_name.address.to_short_string(),
            RED_PACKET_ADDRESS
        );
        assert_eq!(func.args.len(), 2);
        assert_eq!(func.args[0].name, "count");
        assert_eq!(func.args[0].type_tag, TypeTag::U64);
        assert_eq!(func.args[1].name, "total_balance");
        assert_eq!(func.args[1].type_tag, TypeTag::U64);
    }

    #[test]
    fn test_abi_roundtrip() {
        for fixture in [
            RED_PACKET_CREATE_ABI,
            RED_PACKET_OPEN_ABI,
            RED_PACKET_CLOSE_ABI,
        ] {
            let bytes = hex::decode(fixture).unwrap();
            let abi: ScriptABI = bcs::from_bytes(&bytes).unwrap();
            assert_eq!(bcs::to_bytes(&abi).unwrap(), bytes);
        }
    }

    #[test]
    fn test_conflicting_abi_rejected() {
        let blob = hex::decode(RED_PACKET_CREATE_ABI).unwrap();
        let result = AbiPayloadBuilder::new(&[blob.clone(), blob]);
        assert!(matches!(result, Err(AptosError::ConflictingAbi(_))));
    }

    #[test]
    fn test_build_matches_hand_built_payload() {
        let builder = red_packet_builder();
        let function = format!("{}::red_packet::create", RED_PACKET_ADDRESS);

        let payload = builder
            .build_transaction_payload(&function, &[], vec![5u64.into(), "1000000".into()])
            .unwrap();

        let hand_built = TransactionPayload::EntryFunction(EntryFunction::new(
            ModuleId::new(
                AccountAddress::from_hex(RED_PACKET_ADDRESS).unwrap(),
                Identifier::new("red_packet").unwrap(),
            ),
            Identifier::new("create").unwrap(),
            vec![],
            vec![
                bcs::to_bytes(&5u64).unwrap(),
                bcs::to_bytes(&1_000_000u64).unwrap(),
            ],
        ));

        assert_eq!(payload, hand_built);
        assert_eq!(
            bcs::to_bytes(&payload).unwrap(),
            bcs::to_bytes(&hand_built).unwrap()
        );
    }

    #[test]
    fn test_build_with_vector_arguments() {
        let builder = red_packet_builder();
        let function = format!("{}::red_packet::open", RED_PACKET_ADDRESS);

        let payload = builder
            .build_transaction_payload(
                &function,
                &[],
                vec![
                    5u64.into(),
                    ArgValue::Vector(vec!["0x1".into(), "0x22".into()]),
                    ArgValue::Vector(vec![100u64.into(), 200u64.into()]),
                ],
            )
            .unwrap();

        let TransactionPayload::EntryFunction(entry) = payload else {
            panic!("expected entry function payload");
        };
        assert_eq!(entry.args.len(), 3);
        // vector<address>: count prefix plus two 32-byte addresses
        assert_eq!(entry.args[1].len(), 1 + 2 * 32);
        assert_eq!(entry.args[1][0], 2);
        // vector<u64>: count prefix plus two 8-byte values
        assert_eq!(entry.args[2].len(), 1 + 2 * 8);
    }

    #[test]
    fn test_full_length_address_lookup_is_normalized() {
        let abi = ScriptABI::EntryFunction(EntryFunctionABI {
            name: "register".to_string(),
            module_name: ModuleId::from_str_strict("0x1::managed_coin").unwrap(),
            doc: String::new(),
            ty_args: vec![],
            args: vec![],
        });
        let builder = AbiPayloadBuilder::from_abis(vec![abi]).unwrap();

        // The index key uses the short address form; a full-width address
        // must resolve to the same entry.
        let full = format!("0x{:0>64}::managed_coin::register", "1");
        let payload = builder
            .build_transaction_payload(&full, &[], vec![])
            .unwrap();
        assert!(matches!(payload, TransactionPayload::EntryFunction(_)));
    }

    #[test]
    fn test_unknown_function_not_found() {
        let builder = red_packet_builder();
        let err = builder
            .build_transaction_payload("0x1::coin::missing", &[], vec![])
            .unwrap_err();
        assert!(matches!(err, AptosError::NotFound(_)));
    }

    #[test]
    fn test_arity_mismatch() {
        let builder = red_packet_builder();
        let function = format!("{}::red_packet::create", RED_PACKET_ADDRESS);
        let err = builder
            .build_transaction_payload(&function, &[], vec![5u64.into()])
            .unwrap_err();
        assert!(matches!(
            err,
            AptosError::ArityMismatch {
                expected: 2,
                provided: 1
            }
        ));
    }

    #[test]
    fn test_leading_signer_is_stripped() {
        let abi = ScriptABI::EntryFunction(EntryFunctionABI {
            name: "stake".to_string(),
            module_name: ModuleId::from_str_strict("0x1::staking").unwrap(),
            doc: String::new(),
            ty_args: vec![],
            args: vec![
                ArgumentABI {
                    name: "account".to_string(),
                    type_tag: TypeTag::Signer,
                },
                ArgumentABI {
                    name: "amount".to_string(),
                    type_tag: TypeTag::U64,
                },
            ],
        });
        let builder = AbiPayloadBuilder::from_abis(vec![abi]).unwrap();

        // One argument suffices: the signer slot is implicit
        let payload = builder
            .build_transaction_payload("0x1::staking::stake", &[], vec![77u64.into()])
            .unwrap();
        let TransactionPayload::EntryFunction(entry) = payload else {
            panic!("expected entry function payload");
        };
        assert_eq!(entry.args, vec![77u64.to_le_bytes().to_vec()]);
    }

    #[test]
    fn test_type_args_are_parsed() {
        let abi = ScriptABI::EntryFunction(EntryFunctionABI {
            name: "transfer".to_string(),
            module_name: ModuleId::from_str_strict("0x1::coin").unwrap(),
            doc: String::new(),
            ty_args: vec![TypeArgumentABI {
                name: "CoinType".to_string(),
            }],
            args: vec![
                ArgumentABI {
                    name: "to".to_string(),
                    type_tag: TypeTag::Address,
                },
                ArgumentABI {
                    name: "amount".to_string(),
                    type_tag: TypeTag::U64,
                },
            ],
        });
        let builder = AbiPayloadBuilder::from_abis(vec![abi]).unwrap();

        let payload = builder
            .build_transaction_payload(
                "0x1::coin::transfer",
                &["0x1::aptos_coin::AptosCoin".to_string()],
                vec!["0x22".into(), "100".into()],
            )
            .unwrap();

        let TransactionPayload::EntryFunction(entry) = payload else {
            panic!("expected entry function payload");
        };
        assert_eq!(entry.ty_args, vec![TypeTag::aptos_coin()]);
        assert_eq!(entry.args[1], 100u64.to_le_bytes().to_vec());
    }

    #[test]
    fn test_bad_type_arg_fails_build() {
        let builder = red_packet_builder();
        let function = format!("{}::red_packet::close", RED_PACKET_ADDRESS);
        let err = builder
            .build_transaction_payload(&function, &["u64<u8>".to_string()], vec![1u64.into()])
            .unwrap_err();
        assert!(matches!(err, AptosError::Parse(_)));
    }

    #[test]
    fn test_script_abi_build() {
        let abi = ScriptABI::TransactionScript(TransactionScriptABI {
            name: "main".to_string(),
            doc: String::new(),
            code: vec![0xa1, 0x1c, 0xeb],
            ty_args: vec![],
            args: vec![
                ArgumentABI {
                    name: "amount".to_string(),
                    type_tag: TypeTag::U64,
                },
                ArgumentABI {
                    name: "to".to_string(),
                    type_tag: TypeTag::Address,
                },
            ],
        });
        let builder = AbiPayloadBuilder::from_abis(vec![abi]).unwrap();

        let payload = builder
            .build_transaction_payload("main", &[], vec![9u64.into(), "0x1".into()])
            .unwrap();

        let TransactionPayload::Script(script) = payload else {
            panic!("expected script payload");
        };
        assert_eq!(script.code, vec![0xa1, 0x1c, 0xeb]);
        assert_eq!(
            script.args,
            vec![
                crate::transaction::TransactionArgument::U64(9),
                crate::transaction::TransactionArgument::Address(AccountAddress::ONE),
            ]
        );
    }

    #[test]
    fn test_script_args_reject_widening() {
        let abi = ScriptABI::TransactionScript(TransactionScriptABI {
            name: "main".to_string(),
            doc: String::new(),
            code: vec![0x01],
            ty_args: vec![],
            args: vec![ArgumentABI {
                name: "amount".to_string(),
                type_tag: TypeTag::U64,
            }],
        });
        let builder = AbiPayloadBuilder::from_abis(vec![abi]).unwrap();

        // The legacy coercion accepts only exact u64 values
        let err = builder
            .build_transaction_payload("main", &[], vec!["100".into()])
            .unwrap_err();
        assert!(matches!(err, AptosError::TypeMismatch(_)));
    }
}
