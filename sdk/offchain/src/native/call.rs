//! Decoding of native gas contract calls found in invocation scripts.

use {
  crate::{Error, AUTH_CONTRACT, DID_CONTRACT, GLOBAL_PARAMS_CONTRACT},
  dna_primitives::{Address, Transaction},
  dna_vm::{parse_native_invocation, Operand},
  serde::{Deserialize, Serialize},
  tracing::debug,
};

/// How many operands a method consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
  /// Exactly this many operands.
  Fixed(usize),
  /// One or more groups of this many operands.
  Batch(usize),
}

impl Arity {
  fn accepts(&self, count: usize) -> bool {
    match *self {
      Arity::Fixed(n) => count == n,
      Arity::Batch(n) => count > 0 && count % n == 0,
    }
  }
}

type Decoder = fn(&[Operand]) -> Result<CallArguments, String>;

/// Shape of a method's arguments and how to rebuild them from operands.
pub struct CallSignature {
  pub method: &'static str,
  pub arity: Arity,
  decode: Decoder,
}

static SIGNATURES: &[CallSignature] = &[
  CallSignature {
    method: "transfer",
    arity: Arity::Batch(3),
    decode: decode_transfer,
  },
  CallSignature {
    method: "transferFrom",
    arity: Arity::Fixed(4),
    decode: decode_transfer_from,
  },
  CallSignature {
    method: "approve",
    arity: Arity::Fixed(3),
    decode: decode_approve,
  },
  CallSignature {
    method: "allowance",
    arity: Arity::Fixed(2),
    decode: decode_allowance,
  },
  CallSignature {
    method: "balanceOf",
    arity: Arity::Fixed(1),
    decode: decode_balance_of,
  },
];

/// Looks up the signature of a decodable method.
pub fn call_signature(method: &str) -> Option<&'static CallSignature> {
  SIGNATURES.iter().find(|s| s.method == method)
}

/// A movement of tokens between two accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferState {
  pub from: Address,
  pub to: Address,
  pub amount: u64,
}

/// A transfer executed by `sender` against an allowance granted by `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferFromState {
  pub sender: Address,
  pub from: Address,
  pub to: Address,
  pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallArguments {
  /// Transfers in call order.
  Transfer(Vec<TransferState>),
  TransferFrom(TransferFromState),
  Approve(TransferState),
  Allowance { from: Address, to: Address },
  BalanceOf { owner: Address },
}

/// A native contract call recovered from its invocation script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedCall {
  pub method: String,
  pub contract: Address,
  pub version: u8,
  pub arguments: CallArguments,
}

fn address(operand: &Operand, field: &str) -> Result<Address, String> {
  operand
    .as_address()
    .ok_or_else(|| format!("{field} is not a 20-byte address"))
}

fn amount(operand: &Operand) -> Result<u64, String> {
  operand
    .as_u64()
    .ok_or_else(|| "amount is negative or wider than 64 bits".to_owned())
}

fn transfer_state(operands: &[Operand]) -> Result<TransferState, String> {
  Ok(TransferState {
    from: address(&operands[0], "from")?,
    to: address(&operands[1], "to")?,
    amount: amount(&operands[2])?,
  })
}

fn decode_transfer(operands: &[Operand]) -> Result<CallArguments, String> {
  let mut states = operands
    .chunks(3)
    .map(transfer_state)
    .collect::<Result<Vec<_>, _>>()?;

  // list elements are emitted last to first
  states.reverse();
  Ok(CallArguments::Transfer(states))
}

fn decode_transfer_from(
  operands: &[Operand],
) -> Result<CallArguments, String> {
  Ok(CallArguments::TransferFrom(TransferFromState {
    sender: address(&operands[0], "sender")?,
    from: address(&operands[1], "from")?,
    to: address(&operands[2], "to")?,
    amount: amount(&operands[3])?,
  }))
}

fn decode_approve(operands: &[Operand]) -> Result<CallArguments, String> {
  transfer_state(operands).map(CallArguments::Approve)
}

fn decode_allowance(operands: &[Operand]) -> Result<CallArguments, String> {
  Ok(CallArguments::Allowance {
    from: address(&operands[0], "from")?,
    to: address(&operands[1], "to")?,
  })
}

fn decode_balance_of(operands: &[Operand]) -> Result<CallArguments, String> {
  Ok(CallArguments::BalanceOf {
    owner: address(&operands[0], "owner")?,
  })
}

/// Built-in native contracts whose methods share names with gas methods
/// but take different arguments.
const NON_TOKEN_CONTRACTS: [Address; 3] = [
  AUTH_CONTRACT.address,
  DID_CONTRACT.address,
  GLOBAL_PARAMS_CONTRACT.address,
];

/// Decodes the invocation script of a native gas contract call.
///
/// Signatures are looked up by method name, so any token contract with
/// the gas contract's interface decodes. Calls into the built-in auth,
/// DID and global params contracts fail with `UnsupportedMethod`, since
/// their `transfer` is not a token transfer. A redeployed auth contract
/// is not recognized here; compare [`DecodedCall::contract`] when that
/// matters.
pub fn parse_payload(script: &[u8]) -> Result<DecodedCall, Error> {
  let invocation = parse_native_invocation(script)?;

  if NON_TOKEN_CONTRACTS.contains(&invocation.contract) {
    return Err(Error::UnsupportedMethod(format!(
      "{} on contract {}",
      invocation.method,
      invocation.contract.to_hex()
    )));
  }

  let signature = call_signature(&invocation.method)
    .ok_or_else(|| Error::UnsupportedMethod(invocation.method.clone()))?;

  let malformed = |reason: String| Error::MalformedCallArguments {
    method: invocation.method.clone(),
    reason,
  };

  if !signature.arity.accepts(invocation.operands.len()) {
    return Err(malformed(format!(
      "expected {:?} operands, found {}",
      signature.arity,
      invocation.operands.len()
    )));
  }

  let arguments =
    (signature.decode)(&invocation.operands).map_err(malformed)?;
  debug!(
    "decoded {} call on {} from {} operands",
    invocation.method,
    invocation.contract.to_hex(),
    invocation.operands.len()
  );

  Ok(DecodedCall {
    method: invocation.method,
    contract: invocation.contract,
    version: invocation.version,
    arguments,
  })
}

/// Decodes the call carried by a serialized invoke transaction.
pub fn parse_from_transaction(bytes: &[u8]) -> Result<DecodedCall, Error> {
  let tx = Transaction::deserialize(bytes)?;
  let code = tx.payload.code().ok_or(Error::NotInvokeTransaction)?;
  parse_payload(code)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn arity() {
    assert!(Arity::Batch(3).accepts(3));
    assert!(Arity::Batch(3).accepts(60));
    assert!(!Arity::Batch(3).accepts(0));
    assert!(!Arity::Batch(3).accepts(4));
    assert!(Arity::Fixed(4).accepts(4));
    assert!(!Arity::Fixed(4).accepts(3));
  }

  #[test]
  fn table_lookup() {
    assert_eq!(call_signature("transfer").unwrap().arity, Arity::Batch(3));
    assert_eq!(
      call_signature("transferFrom").unwrap().arity,
      Arity::Fixed(4)
    );
    assert!(call_signature("mint").is_none());
  }

  #[test]
  fn transfer_groups_are_restored_to_call_order() {
    let a = Address::new([1; 20]);
    let b = Address::new([2; 20]);
    let operands = vec![
      Operand::Bytes(b.to_vec()),
      Operand::Bytes(a.to_vec()),
      Operand::Small(2),
      Operand::Bytes(a.to_vec()),
      Operand::Bytes(b.to_vec()),
      Operand::Small(1),
    ];
    assert_eq!(
      decode_transfer(&operands),
      Ok(CallArguments::Transfer(vec![
        TransferState {
          from: a,
          to: b,
          amount: 1
        },
        TransferState {
          from: b,
          to: a,
          amount: 2
        },
      ]))
    );
  }
}
