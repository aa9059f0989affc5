use {
  crate::{integer, Error},
  dna_primitives::{
    codec::Sink,
    opcode::{self, StructuralOp, NATIVE_INVOKE_NAME, PUSH0, PUSH1},
    Address,
  },
  serde::{Deserialize, Serialize},
  std::{
    fmt::{Debug, Display},
    ops::Deref,
  },
  tracing::debug,
};

/// Lists and records may nest at most this deep, counting the top-level
/// argument as the first level.
pub const MAX_NESTING: usize = 16;

/// A single argument to a native contract method.
///
/// Records are positional on the wire; field names only document what
/// each position means and are not encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallArgument {
  Bytes(Vec<u8>),
  String(String),
  Integer(u64),
  Bool(bool),
  Address(Address),
  List(Vec<CallArgument>),
  Record(Vec<(String, CallArgument)>),
}

impl CallArgument {
  pub fn record<const N: usize>(fields: [(&str, CallArgument); N]) -> Self {
    CallArgument::Record(
      fields
        .into_iter()
        .map(|(name, value)| (name.to_owned(), value))
        .collect(),
    )
  }
}

impl From<Vec<u8>> for CallArgument {
  fn from(value: Vec<u8>) -> Self {
    CallArgument::Bytes(value)
  }
}

impl From<&[u8]> for CallArgument {
  fn from(value: &[u8]) -> Self {
    CallArgument::Bytes(value.to_vec())
  }
}

impl From<String> for CallArgument {
  fn from(value: String) -> Self {
    CallArgument::String(value)
  }
}

impl From<&str> for CallArgument {
  fn from(value: &str) -> Self {
    CallArgument::String(value.to_owned())
  }
}

impl From<u64> for CallArgument {
  fn from(value: u64) -> Self {
    CallArgument::Integer(value)
  }
}

impl From<bool> for CallArgument {
  fn from(value: bool) -> Self {
    CallArgument::Bool(value)
  }
}

impl From<Address> for CallArgument {
  fn from(value: Address) -> Self {
    CallArgument::Address(value)
  }
}

impl From<Vec<CallArgument>> for CallArgument {
  fn from(value: Vec<CallArgument>) -> Self {
    CallArgument::List(value)
  }
}

/// Bytecode of an invocation script. Immutable once built.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationScript(Vec<u8>);

impl InvocationScript {
  pub fn as_bytes(&self) -> &[u8] {
    &self.0
  }

  pub fn into_bytes(self) -> Vec<u8> {
    self.0
  }

  pub fn to_hex(&self) -> String {
    hex::encode(&self.0)
  }
}

impl AsRef<[u8]> for InvocationScript {
  fn as_ref(&self) -> &[u8] {
    &self.0
  }
}

impl Deref for InvocationScript {
  type Target = [u8];

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl From<InvocationScript> for Vec<u8> {
  fn from(script: InvocationScript) -> Self {
    script.0
  }
}

impl Display for InvocationScript {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.to_hex())
  }
}

impl Debug for InvocationScript {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "script({})", self.to_hex())
  }
}

/// Emits stack instructions one at a time.
#[derive(Debug, Default)]
pub struct ScriptBuilder {
  sink: Sink,
}

impl ScriptBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push_bytes(&mut self, data: &[u8]) -> &mut Self {
    opcode::write_push_bytes(&mut self.sink, data);
    self
  }

  pub fn push_integer(&mut self, value: u64) -> &mut Self {
    match value {
      0 => {
        self.sink.write_u8(PUSH0);
      }
      1..=16 => {
        self.sink.write_u8(PUSH1 + (value as u8 - 1));
      }
      _ => {
        self.push_bytes(&integer::encode_u64(value));
      }
    }
    self
  }

  pub fn push_bool(&mut self, value: bool) -> &mut Self {
    self.sink.write_u8(if value { PUSH1 } else { PUSH0 });
    self
  }

  pub fn emit(&mut self, op: StructuralOp) -> &mut Self {
    self.sink.write_u8(op.byte());
    self
  }

  /// `APPCALL` and the callee's address, written raw rather than pushed.
  pub fn app_call(&mut self, contract: &Address) -> &mut Self {
    self
      .sink
      .write_u8(StructuralOp::AppCall.byte())
      .write_bytes(contract.as_ref());
    self
  }

  pub fn push_argument(
    &mut self,
    argument: &CallArgument,
  ) -> Result<&mut Self, Error> {
    self.push_nested(argument, 1)?;
    Ok(self)
  }

  fn push_nested(
    &mut self,
    argument: &CallArgument,
    depth: usize,
  ) -> Result<(), Error> {
    if depth > MAX_NESTING {
      return Err(Error::UnsupportedArgumentShape(format!(
        "arguments nested deeper than {MAX_NESTING} levels"
      )));
    }

    match argument {
      CallArgument::Bytes(bytes) => {
        self.push_bytes(bytes);
      }
      CallArgument::String(s) => {
        self.push_bytes(s.as_bytes());
      }
      CallArgument::Integer(value) => {
        self.push_integer(*value);
      }
      CallArgument::Bool(value) => {
        self.push_bool(*value);
      }
      CallArgument::Address(address) => {
        self.push_bytes(address.as_ref());
      }
      CallArgument::List(items) => {
        // the VM pops list elements in reverse
        for item in items.iter().rev() {
          self.push_nested(item, depth + 1)?;
        }
        self.push_integer(items.len() as u64);
        self.emit(StructuralOp::Pack);
      }
      CallArgument::Record(fields) => {
        if fields.is_empty() {
          return Err(Error::UnsupportedArgumentShape(
            "record without fields".into(),
          ));
        }
        self
          .push_integer(0)
          .emit(StructuralOp::NewStruct)
          .emit(StructuralOp::ToAltStack);
        for (_, value) in fields {
          self.emit(StructuralOp::DupFromAltStack);
          self.push_nested(value, depth + 1)?;
          self.emit(StructuralOp::Append);
        }
        self.emit(StructuralOp::FromAltStack);
      }
    }
    Ok(())
  }

  pub fn len(&self) -> usize {
    self.sink.len()
  }

  pub fn is_empty(&self) -> bool {
    self.sink.is_empty()
  }

  pub fn into_script(self) -> InvocationScript {
    InvocationScript(self.sink.into_bytes())
  }
}

/// Builds the script that calls `method` on the native contract at
/// `contract`.
///
/// Arguments are given in call order and emitted last to first, so the
/// first argument ends up on top of the stack. A call without arguments
/// still passes a single empty string, since native methods always read
/// one parameter.
pub fn build_native_invoke(
  contract: &Address,
  version: u8,
  method: &str,
  args: &[CallArgument],
) -> Result<InvocationScript, Error> {
  let placeholder = [CallArgument::String(String::new())];
  let args = if args.is_empty() { &placeholder[..] } else { args };

  let mut builder = ScriptBuilder::new();
  for arg in args.iter().rev() {
    builder.push_argument(arg)?;
  }

  builder
    .push_bytes(method.as_bytes())
    .push_bytes(contract.as_ref())
    .push_integer(version as u64)
    .emit(StructuralOp::Syscall)
    .push_bytes(NATIVE_INVOKE_NAME.as_bytes());

  debug!(
    "built native invocation of {method} on {} ({} bytes)",
    contract.to_hex(),
    builder.len()
  );
  Ok(builder.into_script())
}

/// Builds the script that calls the deployed NeoVM contract at
/// `contract`.
///
/// Arguments are emitted last to first as in native calls. An empty
/// argument list stays empty: the called contract decides what it reads.
pub fn build_neovm_invoke(
  contract: &Address,
  args: &[CallArgument],
) -> Result<InvocationScript, Error> {
  let mut builder = ScriptBuilder::new();
  for arg in args.iter().rev() {
    builder.push_argument(arg)?;
  }
  builder.app_call(contract);

  debug!(
    "built neovm invocation of {} ({} bytes)",
    contract.to_hex(),
    builder.len()
  );
  Ok(builder.into_script())
}
