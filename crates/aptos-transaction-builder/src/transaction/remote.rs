//! Payload building from remotely-fetched module descriptors.
//!
//! Instead of pre-supplied ABI blobs, this path sources function metadata
//! from a module descriptor a node returned as JSON. Fetching is the
//! transport layer's job: it hands the descriptor over through the
//! synchronous [`ModuleResolver`] seam and this module never touches the
//! network.

use crate::error::{AptosError, AptosResult};
use crate::transaction::abi::{
    AbiPayloadBuilder, ArgumentABI, EntryFunctionABI, ScriptABI, TypeArgumentABI,
};
use crate::transaction::coerce::ArgValue;
use crate::transaction::payload::TransactionPayload;
use crate::types::{parse_type_tag, AccountAddress, Identifier, ModuleId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A module descriptor as returned by a node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveModule {
    /// The module bytecode as hex (unused here, carried for fidelity).
    #[serde(default)]
    pub bytecode: String,
    /// The module ABI; absent for modules compiled without metadata.
    pub abi: Option<MoveModuleAbi>,
}

/// The ABI section of a module descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveModuleAbi {
    /// The address the module is published under.
    pub address: String,
    /// The module name.
    pub name: String,
    /// Every function the module exposes.
    #[serde(default)]
    pub exposed_functions: Vec<MoveFunction>,
}

/// One exposed function of a module descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveFunction {
    /// The function name.
    pub name: String,
    /// Visibility: `public`, `friend`, or `private`.
    #[serde(default)]
    pub visibility: String,
    /// Whether the function can be called directly as a transaction.
    #[serde(default)]
    pub is_entry: bool,
    /// Generic type parameters.
    #[serde(default)]
    pub generic_type_params: Vec<MoveFunctionGenericTypeParam>,
    /// Parameter types as textual type signatures.
    #[serde(default)]
    pub params: Vec<String>,
    /// Return types as textual type signatures.
    #[serde(default, rename = "return")]
    pub return_types: Vec<String>,
}

/// A generic type parameter with its ability constraints.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveFunctionGenericTypeParam {
    /// Ability constraints (`copy`, `drop`, `store`, `key`).
    #[serde(default)]
    pub constraints: Vec<String>,
}

/// The synchronous seam the excluded transport implements.
///
/// `get_module` returns an already-fetched descriptor; a missing module
/// surfaces as [`AptosError::NotFound`].
pub trait ModuleResolver {
    /// Resolves a module descriptor by address and module name.
    fn get_module(&self, address: &str, module_name: &str) -> AptosResult<MoveModule>;
}

/// Builds entry-function payloads from a live module descriptor.
///
/// Only `is_entry` functions are indexed. Parameter lists keep their
/// textual form until build time, when `signer`/`&signer` entries are
/// dropped and the rest are parsed through the type-tag grammar.
#[derive(Debug, Clone)]
pub struct RemoteAbiBuilder {
    entry_functions: HashMap<String, MoveFunction>,
}

impl RemoteAbiBuilder {
    /// Creates a builder for one module, resolving its descriptor.
    ///
    /// # Errors
    ///
    /// Fails on an invalid contract address, an empty module name, a
    /// resolver miss, or a descriptor without an ABI section.
    pub fn new(
        contract_address: &str,
        module_name: &str,
        resolver: &dyn ModuleResolver,
    ) -> AptosResult<Self> {
        AccountAddress::from_hex(contract_address).map_err(|_| {
            AptosError::InvalidAddress(format!("invalid contract address {contract_address}"))
        })?;
        let module_name = module_name.trim();
        if module_name.is_empty() {
            return Err(AptosError::NotFound(
                "the module name cannot be empty".to_string(),
            ));
        }

        let module = resolver.get_module(contract_address, module_name)?;
        let abi = module.abi.ok_or_else(|| {
            AptosError::NotFound(format!(
                "module {contract_address}::{module_name} has no ABI"
            ))
        })?;

        let address = AccountAddress::from_hex(&abi.address)?;
        let abi_name = format!("{}::{}", address.to_short_string(), abi.name);

        let mut entry_functions = HashMap::new();
        for function in abi.exposed_functions {
            if !function.is_entry {
                continue;
            }
            entry_functions.insert(format!("{}::{}", abi_name, function.name), function);
        }

        Ok(Self { entry_functions })
    }

    /// Creates a builder from a function or module id string
    /// (`0x1111::module_name` or `0x1111::module_name::func_name`).
    pub fn from_function_id(function_id: &str, resolver: &dyn ModuleResolver) -> AptosResult<Self> {
        let parts: Vec<&str> = function_id.split("::").collect();
        if parts.len() < 2 {
            return Err(AptosError::Parse(format!(
                "invalid function name `{function_id}`"
            )));
        }
        Self::new(parts[0], parts[1], resolver)
    }

    /// Returns the number of indexed entry functions.
    pub fn num_entry_functions(&self) -> usize {
        self.entry_functions.len()
    }

    /// Builds an entry-function payload, applying the same
    /// signer-stripping and coercion rules as the local ABI builder.
    pub fn build_transaction_payload(
        &self,
        function: &str,
        ty_tags: &[String],
        args: Vec<ArgValue>,
    ) -> AptosResult<TransactionPayload> {
        let parts: Vec<&str> = function.split("::").collect();
        if parts.len() != 3 {
            return Err(AptosError::Parse(format!(
                "invalid function name `{function}`"
            )));
        }
        let address = AccountAddress::from_hex(parts[0])?;
        let module = Identifier::new(parts[1])?;
        let name = Identifier::new(parts[2])?;
        let key = format!("{}::{}::{}", address.to_short_string(), module, name);

        let func_abi = self
            .entry_functions
            .get(&key)
            .ok_or_else(|| AptosError::NotFound(key.clone()))?;

        // Signer parameters are implicit; everything else must parse as
        // a type signature.
        let mut arg_abis = Vec::new();
        for param in &func_abi.params {
            if param == "signer" || param == "&signer" {
                continue;
            }
            arg_abis.push(ArgumentABI {
                name: param.clone(),
                type_tag: parse_type_tag(param)?,
            });
        }

        let ty_arg_abis = (0..func_abi.generic_type_params.len())
            .map(|idx| TypeArgumentABI {
                name: idx.to_string(),
            })
            .collect();

        let entry_abi = EntryFunctionABI {
            name: func_abi.name.clone(),
            module_name: ModuleId::new(address, module),
            doc: String::new(),
            ty_args: ty_arg_abis,
            args: arg_abis,
        };

        let builder = AbiPayloadBuilder::from_abis(vec![ScriptABI::EntryFunction(entry_abi)])?;
        builder.build_transaction_payload(&key, ty_tags, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::payload::EntryFunction;
    use crate::types::TypeTag;

    struct FixtureResolver {
        module: MoveModule,
    }

    impl ModuleResolver for FixtureResolver {
        fn get_module(&self, address: &str, module_name: &str) -> AptosResult<MoveModule> {
            let abi = self.module.abi.as_ref().expect("fixture has an abi");
            if abi.address == address && abi.name == module_name {
                Ok(self.module.clone())
            } else {
                Err(AptosError::NotFound(format!(
                    "{address}::{module_name}"
                )))
            }
        }
    }

    fn coin_module() -> MoveModule {
        serde_json::from_value(serde_json::json!({
            "bytecode": "0x",
            "abi": {
                "address": "0x1",
                "name": "coin",
                "exposed_functions": [
                    {
                        "name": "transfer",
                        "visibility": "public",
                        "is_entry": true,
                        "generic_type_params": [{"constraints": []}],
                        "params": ["&signer", "address", "u64"],
                        "return": []
                    },
                    {
                        "name": "balance",
                        "visibility": "public",
                        "is_entry": false,
                        "generic_type_params": [{"constraints": []}],
                        "params": ["address"],
                        "return": ["u64"]
                    }
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_descriptor_json_model() {
        let module = coin_module();
        let abi = module.abi.as_ref().unwrap();
        assert_eq!(abi.address, "0x1");
        assert_eq!(abi.name, "coin");
        assert_eq!(abi.exposed_functions.len(), 2);
        assert!(abi.exposed_functions[0].is_entry);
        assert_eq!(abi.exposed_functions[1].return_types, vec!["u64"]);
    }

    #[test]
    fn test_only_entry_functions_are_indexed() {
        let resolver = FixtureResolver {
            module: coin_module(),
        };
        let builder = RemoteAbiBuilder::new("0x1", "coin", &resolver).unwrap();
        assert_eq!(builder.num_entry_functions(), 1);
    }

    #[test]
    fn test_build_payload_strips_signer() {
        let resolver = FixtureResolver {
            module: coin_module(),
        };
        let builder = RemoteAbiBuilder::new("0x1", "coin", &resolver).unwrap();

        let payload = builder
            .build_transaction_payload(
                "0x1::coin::transfer",
                &["0x1::aptos_coin::AptosCoin".to_string()],
                vec!["0x22".into(), "100".into()],
            )
            .unwrap();

        let expected = TransactionPayload::EntryFunction(EntryFunction::new(
            ModuleId::from_str_strict("0x1::coin").unwrap(),
            crate::types::Identifier::new("transfer").unwrap(),
            vec![TypeTag::aptos_coin()],
            vec![
                crate::bcs::to_bytes(&AccountAddress::from_hex("0x22").unwrap()).unwrap(),
                crate::bcs::to_bytes(&100u64).unwrap(),
            ],
        ));
        assert_eq!(payload, expected);
    }

    #[test]
    fn test_non_entry_function_not_found() {
        let resolver = FixtureResolver {
            module: coin_module(),
        };
        let builder = RemoteAbiBuilder::new("0x1", "coin", &resolver).unwrap();
        let err = builder
            .build_transaction_payload("0x1::coin::balance", &[], vec!["0x1".into()])
            .unwrap_err();
        assert!(matches!(err, AptosError::NotFound(_)));
    }

    #[test]
    fn test_from_function_id() {
        let resolver = FixtureResolver {
            module: coin_module(),
        };
        let builder =
            RemoteAbiBuilder::from_function_id("0x1::coin::transfer", &resolver).unwrap();
        assert_eq!(builder.num_entry_functions(), 1);

        assert!(RemoteAbiBuilder::from_function_id("justaname", &resolver).is_err());
    }

    #[test]
    fn test_invalid_inputs() {
        let resolver = FixtureResolver {
            module: coin_module(),
        };
        assert!(RemoteAbiBuilder::new("not-an-address", "coin", &resolver).is_err());
        assert!(RemoteAbiBuilder::new("0x1", "  ", &resolver).is_err());
        assert!(RemoteAbiBuilder::new("0x1", "missing", &resolver).is_err());
    }

    #[test]
    fn test_module_without_abi() {
        struct NoAbi;
        impl ModuleResolver for NoAbi {
            fn get_module(&self, _: &str, _: &str) -> AptosResult<MoveModule> {
                Ok(MoveModule {
                    bytecode: "0x".to_string(),
                    abi: None,
                })
            }
        }
        assert!(RemoteAbiBuilder::new("0x1", "coin", &NoAbi).is_err());
    }

    #[test]
    fn test_arity_checked_after_signer_stripping() {
        let resolver = FixtureResolver {
            module: coin_module(),
        };
        let builder = RemoteAbiBuilder::new("0x1", "coin", &resolver).unwrap();
        let err = builder
            .build_transaction_payload("0x1::coin::transfer", &[], vec!["0x22".into()])
            .unwrap_err();
        assert!(matches!(
            err,
            AptosError::ArityMismatch {
                expected: 2,
                provided: 1
            }
        ));
    }
}
