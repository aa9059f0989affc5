use {
  dna_primitives::{codec, AddressError, KeyError, TransactionError},
  thiserror::Error,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("Truncated {section} section: {source}")]
  TruncatedInput {
    section: &'static str,
    source: codec::Error,
  },

  #[error("Malformed arguments for {method}: {reason}")]
  MalformedCallArguments { method: String, reason: String },

  #[error("Unsupported method {0:?}")]
  UnsupportedMethod(String),

  #[error(transparent)]
  UnknownKeyEncoding(#[from] KeyError),

  #[error("Invalid address in {section} section: {source}")]
  AddressDecode {
    section: &'static str,
    source: AddressError,
  },

  #[error("Transaction does not carry an invocation script")]
  NotInvokeTransaction,

  #[error("Invalid secret key: {0}")]
  InvalidSecretKey(#[from] ed25519_dalek::SignatureError),

  #[error(transparent)]
  Script(#[from] dna_vm::Error),

  #[error(transparent)]
  Transaction(#[from] TransactionError),
}
