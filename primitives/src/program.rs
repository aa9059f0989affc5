//! Witness programs for single-key accounts.
//!
//! A witness is a pair of scripts: the invocation script pushes the
//! signature and the verification script pushes the public key and runs
//! `CHECKSIG`.

use crate::{
  codec::{self, Sink, Source},
  opcode::{self, Push, CHECKSIG},
  PublicKey,
};

pub fn verification_script(key: &PublicKey) -> Vec<u8> {
  let mut sink = Sink::with_capacity(key.as_bytes().len() + 2);
  opcode::write_push_bytes(&mut sink, key.as_bytes());
  sink.write_u8(CHECKSIG);
  sink.into_bytes()
}

pub fn invocation_script(signature: &[u8]) -> Vec<u8> {
  let mut sink = Sink::with_capacity(signature.len() + 2);
  opcode::write_push_bytes(&mut sink, signature);
  sink.into_bytes()
}

/// Reads a script that consists of exactly one data push followed by
/// `trailer`. Returns the pushed bytes, or `None` when the script has any
/// other shape.
fn single_push<'a>(
  script: &'a [u8],
  trailer: &[u8],
) -> Result<Option<&'a [u8]>, codec::Error> {
  let mut source = Source::new(script);
  let opcode = source.read_u8()?;
  let data = match opcode::read_push(&mut source, opcode)? {
    Some(Push::Bytes(data)) => data,
    _ => return Ok(None),
  };
  let rest = source.read_bytes(source.remaining() as u64)?;
  Ok((rest == trailer).then_some(data))
}

pub fn signature_from_invocation(
  script: &[u8],
) -> Result<Option<&[u8]>, codec::Error> {
  single_push(script, &[])
}

pub fn key_from_verification(
  script: &[u8],
) -> Result<Option<&[u8]>, codec::Error> {
  single_push(script, &[CHECKSIG])
}

#[cfg(test)]
mod tests {
  use {super::*, crate::PublicKey};

  #[test]
  fn programs_roundtrip() {
    let mut key = vec![0x14, 0x19];
    key.extend_from_slice(&[9u8; 32]);
    let key = PublicKey::from_bytes(&key).unwrap();

    let verification = verification_script(&key);
    assert_eq!(verification[0], 34);
    assert_eq!(*verification.last().unwrap(), CHECKSIG);
    assert_eq!(
      key_from_verification(&verification).unwrap(),
      Some(key.as_bytes())
    );

    let signature = [0x0Au8; 65];
    let invocation = invocation_script(&signature);
    assert_eq!(
      signature_from_invocation(&invocation).unwrap(),
      Some(&signature[..])
    );
  }

  #[test]
  fn other_shapes_are_not_single_key() {
    assert_eq!(key_from_verification(&[0x51, CHECKSIG]).unwrap(), None);
    assert_eq!(key_from_verification(&[0x01, 0xAA]).unwrap(), None);
    assert_eq!(
      signature_from_invocation(&[0x01, 0xAA, 0x01, 0xBB]).unwrap(),
      None
    );
    assert!(key_from_verification(&[]).is_err());
  }
}
