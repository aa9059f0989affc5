use {
  crate::{integer, Error},
  dna_primitives::{
    codec::Source,
    opcode::{self, Push, StructuralOp, NATIVE_INVOKE_NAME},
    Address,
  },
  serde::{Deserialize, Serialize},
  tracing::trace,
};

/// A value pushed onto the stack by an invocation script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
  Bytes(Vec<u8>),
  /// Pushed by `PUSHM1` or `PUSH1..=PUSH16`.
  Small(i8),
}

impl Operand {
  pub fn as_bytes(&self) -> Option<&[u8]> {
    match self {
      Operand::Bytes(bytes) => Some(bytes),
      Operand::Small(_) => None,
    }
  }

  pub fn as_u64(&self) -> Option<u64> {
    match self {
      Operand::Bytes(bytes) => integer::decode_u64(bytes),
      Operand::Small(n) => u64::try_from(*n).ok(),
    }
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Operand::Bytes(bytes) if bytes.is_empty() => Some(false),
      Operand::Small(1) => Some(true),
      _ => None,
    }
  }

  pub fn as_address(&self) -> Option<Address> {
    self
      .as_bytes()
      .and_then(|bytes| Address::from_slice(bytes).ok())
  }

  pub fn as_string(&self) -> Option<String> {
    self
      .as_bytes()
      .and_then(|bytes| String::from_utf8(bytes.to_vec()).ok())
  }
}

impl From<Push<'_>> for Operand {
  fn from(push: Push<'_>) -> Self {
    match push {
      Push::Bytes(bytes) => Operand::Bytes(bytes.to_vec()),
      Push::Small(n) => Operand::Small(n),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
  Push { offset: usize, operand: Operand },
  Op { offset: usize, op: StructuralOp },
}

impl Instruction {
  pub fn offset(&self) -> usize {
    match self {
      Instruction::Push { offset, .. } | Instruction::Op { offset, .. } => {
        *offset
      }
    }
  }

  fn is_size_marker(&self) -> bool {
    matches!(self, Instruction::Op {
      op: StructuralOp::NewStruct | StructuralOp::Pack,
      ..
    })
  }
}

/// Splits a script into instructions.
///
/// Only pushes and the structural opcodes of [`StructuralOp`] are
/// accepted; anything else means the script does more than pass
/// arguments to a contract.
pub fn scan(script: &[u8]) -> Result<Vec<Instruction>, Error> {
  let mut source = Source::new(script);
  let mut instructions = vec![];

  while !source.is_empty() {
    let offset = source.position();
    let opcode = source.read_u8()?;

    let instruction = match opcode::read_push(&mut source, opcode)? {
      Some(push) => Instruction::Push {
        offset,
        operand: push.into(),
      },
      None => Instruction::Op {
        offset,
        op: StructuralOp::from_byte(opcode)
          .ok_or(Error::UnrecognizedOpcode { offset, opcode })?,
      },
    };

    trace!("{offset:>6}: {instruction:?}");
    instructions.push(instruction);
  }

  Ok(instructions)
}

/// Call-level view of a native invocation script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeInvocation {
  pub method: String,
  pub contract: Address,
  pub version: u8,

  /// Argument values in the order they appear in the script. Structure
  /// sizes and list lengths are not included.
  pub operands: Vec<Operand>,
}

/// Recovers the method, target contract and argument values of a native
/// invocation script.
pub fn parse_native_invocation(
  script: &[u8],
) -> Result<NativeInvocation, Error> {
  let instructions = scan(script)?;

  let body = match instructions.as_slice() {
    [body @ .., Instruction::Op {
      op: StructuralOp::Syscall,
      ..
    }, Instruction::Push {
      operand: Operand::Bytes(name),
      ..
    }] if name.as_slice() == NATIVE_INVOKE_NAME.as_bytes() => body,
    _ => {
      return Err(Error::NotNativeInvocation(
        "script does not end with a native invoke syscall",
      ))
    }
  };

  let mut operands: Vec<Operand> = body
    .iter()
    .zip(body.iter().skip(1).map(Some).chain([None]))
    .filter_map(|(current, next)| match current {
      Instruction::Push { operand, .. }
        if !next.map_or(false, Instruction::is_size_marker) =>
      {
        Some(operand.clone())
      }
      _ => None,
    })
    .collect();

  if operands.len() < 3 {
    return Err(Error::NotNativeInvocation(
      "missing method, contract or version",
    ));
  }

  let tail = operands.split_off(operands.len() - 3);
  let method = tail[0]
    .as_string()
    .ok_or(Error::NotNativeInvocation("method name is not a string"))?;
  let contract = tail[1]
    .as_address()
    .ok_or(Error::NotNativeInvocation("contract is not an address"))?;
  let version = tail[2]
    .as_u64()
    .and_then(|v| u8::try_from(v).ok())
    .ok_or(Error::NotNativeInvocation("contract version is not a byte"))?;

  Ok(NativeInvocation {
    method,
    contract,
    version,
    operands,
  })
}
