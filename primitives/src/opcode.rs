//! The subset of NeoVM instructions used by native invocation scripts
//! and by single-key witness programs.

use {
  crate::codec::{self, Sink, Source},
  serde::{Deserialize, Serialize},
};

/// Pushes an empty byte array (also the integer zero and `false`).
pub const PUSH0: u8 = 0x00;
/// Opcodes `0x01..=0x4B` push that many following bytes.
pub const PUSHBYTES1: u8 = 0x01;
pub const PUSHBYTES75: u8 = 0x4B;
pub const PUSHDATA1: u8 = 0x4C;
pub const PUSHDATA2: u8 = 0x4D;
pub const PUSHDATA4: u8 = 0x4E;
pub const PUSHM1: u8 = 0x4F;
pub const PUSH1: u8 = 0x51;
pub const PUSH16: u8 = 0x60;
pub const CHECKSIG: u8 = 0xAC;

/// Name passed to `SYSCALL` to dispatch into a native contract.
pub const NATIVE_INVOKE_NAME: &str = "Ontology.Native.Invoke";

/// Control opcodes that may appear in an invocation script.
///
/// They only shape the evaluation stack and carry no payload. This is a
/// closed set: a script containing any other non-push opcode is not an
/// invocation script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum StructuralOp {
  AppCall = 0x67,
  Syscall = 0x68,
  DupFromAltStack = 0x6A,
  ToAltStack = 0x6B,
  FromAltStack = 0x6C,
  Swap = 0x7C,
  Pack = 0xC1,
  NewStruct = 0xC6,
  Append = 0xC8,
}

impl StructuralOp {
  pub const ALL: [StructuralOp; 9] = [
    StructuralOp::AppCall,
    StructuralOp::Syscall,
    StructuralOp::DupFromAltStack,
    StructuralOp::ToAltStack,
    StructuralOp::FromAltStack,
    StructuralOp::Swap,
    StructuralOp::Pack,
    StructuralOp::NewStruct,
    StructuralOp::Append,
  ];

  pub fn from_byte(byte: u8) -> Option<Self> {
    Self::ALL.into_iter().find(|op| *op as u8 == byte)
  }

  pub fn byte(self) -> u8 {
    self as u8
  }
}

/// A decoded push instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Push<'a> {
  /// `PUSH0`, `PUSHBYTES*` and `PUSHDATA*`.
  Bytes(&'a [u8]),
  /// `PUSHM1` and `PUSH1..=PUSH16`.
  Small(i8),
}

/// True for every opcode that pushes a value onto the stack.
pub fn is_push(opcode: u8) -> bool {
  opcode <= PUSHM1 || (PUSH1..=PUSH16).contains(&opcode)
}

/// Decodes the push instruction whose opcode byte was just read from
/// `source`. Returns `None` when `opcode` is not a push.
pub fn read_push<'a>(
  source: &mut Source<'a>,
  opcode: u8,
) -> Result<Option<Push<'a>>, codec::Error> {
  let push = match opcode {
    PUSH0 => Push::Bytes(&[]),
    PUSHBYTES1..=PUSHBYTES75 => Push::Bytes(source.read_bytes(opcode as u64)?),
    PUSHDATA1 => {
      let len = source.read_u8()?;
      Push::Bytes(source.read_bytes(len as u64)?)
    }
    PUSHDATA2 => {
      let len = source.read_u16()?;
      Push::Bytes(source.read_bytes(len as u64)?)
    }
    PUSHDATA4 => {
      let len = source.read_u32()?;
      Push::Bytes(source.read_bytes(len as u64)?)
    }
    PUSHM1 => Push::Small(-1),
    PUSH1..=PUSH16 => Push::Small((opcode - PUSH1 + 1) as i8),
    _ => return Ok(None),
  };
  Ok(Some(push))
}

/// Emits the shortest push instruction for `data`.
pub fn write_push_bytes(sink: &mut Sink, data: &[u8]) {
  let len = data.len();
  if len < PUSHBYTES75 as usize {
    sink.write_u8(len as u8);
  } else if len <= u8::MAX as usize {
    sink.write_u8(PUSHDATA1).write_u8(len as u8);
  } else if len <= u16::MAX as usize {
    sink.write_u8(PUSHDATA2).write_u16(len as u16);
  } else {
    sink.write_u8(PUSHDATA4).write_u32(len as u32);
  }
  sink.write_bytes(data);
}
