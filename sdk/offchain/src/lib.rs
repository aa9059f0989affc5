//! Offchain SDK for the DNA chain.
//!
//! Builds and signs calls to the native contracts (gas token, DIDs,
//! global parameters and contract authorization) and to deployed NeoVM
//! contracts, packages NeoVM code for deployment, decodes gas contract
//! calls back out of invocation scripts, and reads DID documents returned
//! by queries.

mod config;
pub mod did;
mod error;
pub mod native;
mod neovm;
mod signer;

pub use {
  config::{
    Config,
    ContractRef,
    AUTH_CONTRACT,
    DID_CONTRACT,
    GAS_CONTRACT,
    GLOBAL_PARAMS_CONTRACT,
  },
  did::{decode_ddo, Attribute, Ddo, Did, Owner},
  error::Error,
  native::{
    call::{
      call_signature,
      parse_from_transaction,
      parse_payload,
      Arity,
      CallArguments,
      CallSignature,
      DecodedCall,
      TransferFromState,
      TransferState,
    },
    NativeContract,
  },
  neovm::{ContractMetadata, NeoVmContract},
  signer::{Account, Controller, SHA512_WITH_EDDSA},
};

pub use {
  dna_primitives::{
    Address,
    DeployCode,
    PublicKey,
    SignedTransaction,
    Signer,
    Transaction,
    TxHash,
    VmType,
  },
  dna_vm::{CallArgument, InvocationScript},
};
