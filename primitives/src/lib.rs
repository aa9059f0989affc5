mod address;
pub mod codec;
mod keys;
pub mod opcode;
pub mod program;
mod signer;
mod transaction;

pub use {
  address::{Address, Error as AddressError},
  keys::{Curve, Error as KeyError, KeyType, PublicKey},
  signer::{Error as SignerError, Signer},
  transaction::{
    DeployCode,
    Error as TransactionError,
    Payload,
    SignedTransaction,
    Transaction,
    TxHash,
    TxType,
    VmType,
    Witness,
    MAX_WITNESSES,
  },
};
