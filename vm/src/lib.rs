//! Stack scripts that invoke native and deployed NeoVM contracts.
//!
//! The builder turns a method name and structured arguments into an
//! invocation script, the scanner walks such a script back into its
//! operands. Only the small instruction subset that passes arguments and
//! dispatches into a native contract is supported in either direction.

mod builder;
mod integer;
mod scanner;

use {dna_primitives::codec, thiserror::Error};

pub use {
  builder::{
    build_native_invoke,
    build_neovm_invoke,
    CallArgument,
    InvocationScript,
    ScriptBuilder,
    MAX_NESTING,
  },
  integer::{decode_u64, encode_u64},
  scanner::{
    parse_native_invocation,
    scan,
    Instruction,
    NativeInvocation,
    Operand,
  },
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("Truncated script: {0}")]
  Codec(#[from] codec::Error),

  #[error("Unrecognized opcode {opcode:#04x} at offset {offset}")]
  UnrecognizedOpcode { offset: usize, opcode: u8 },

  #[error("Unsupported argument shape: {0}")]
  UnsupportedArgumentShape(String),

  #[error("Not a native invocation script: {0}")]
  NotNativeInvocation(&'static str),
}
