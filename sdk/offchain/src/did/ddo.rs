//! Decentralized identity documents as returned by the DID contract.
//!
//! A document is three var-bytes sections in a row: the owner keys, the
//! attributes and the recovery address. Each section is itself a packed
//! run of records with no count prefix; a section ends where its bytes do.

use {
  crate::Error,
  dna_primitives::{codec::Source, Address, Curve, KeyType, PublicKey},
  dna_vm::CallArgument,
  serde::{Deserialize, Serialize},
  tracing::debug,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ddo {
  pub id: String,
  pub owners: Vec<Owner>,
  pub attributes: Vec<Attribute>,
  pub recovery: Option<Address>,
}

/// A public key listed in a DID document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
  /// Position of the key in the document, starting at 1.
  pub index: u32,

  /// `<did>#keys-<index>`
  pub id: String,
  pub key_type: KeyType,
  pub curve: Curve,

  /// Hex of the serialized key.
  pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
  pub key: Vec<u8>,
  pub value: Vec<u8>,
  pub value_type: Vec<u8>,
}

impl Attribute {
  pub fn new(
    key: impl Into<Vec<u8>>,
    value: impl Into<Vec<u8>>,
    value_type: impl Into<Vec<u8>>,
  ) -> Self {
    Self {
      key: key.into(),
      value: value.into(),
      value_type: value_type.into(),
    }
  }
}

/// Attributes are sent to the contract as key, value, type; the contract
/// stores them as key, type, value.
impl From<&Attribute> for CallArgument {
  fn from(attribute: &Attribute) -> Self {
    CallArgument::record([
      ("key", attribute.key.clone().into()),
      ("value", attribute.value.clone().into()),
      ("value_type", attribute.value_type.clone().into()),
    ])
  }
}

fn section<'a>(
  source: &mut Source<'a>,
  name: &'static str,
) -> Result<&'a [u8], Error> {
  source
    .read_var_bytes()
    .map_err(|e| Error::TruncatedInput {
      section: name,
      source: e,
    })
}

/// Decodes the owner keys section of a document, or the result of a
/// `getPublicKeys` query.
pub fn decode_public_keys(id: &str, data: &[u8]) -> Result<Vec<Owner>, Error> {
  let truncated = |source| Error::TruncatedInput {
    section: "owners",
    source,
  };

  let mut source = Source::new(data);
  let mut owners = vec![];
  while !source.is_empty() {
    let index = source.read_u32().map_err(truncated)?;
    let key = source.read_var_bytes().map_err(truncated)?;
    let key = PublicKey::from_bytes(key)?;
    owners.push(Owner {
      index,
      id: format!("{id}#keys-{index}"),
      key_type: key.key_type(),
      curve: key.curve(),
      value: key.to_hex(),
    });
  }
  Ok(owners)
}

/// Decodes the attributes section of a document, or the result of a
/// `getAttributes` query.
///
/// Attributes are returned in the reverse of their stored order, which
/// is the order the contract reports them in elsewhere.
pub fn decode_attributes(data: &[u8]) -> Result<Vec<Attribute>, Error> {
  let truncated = |source| Error::TruncatedInput {
    section: "attributes",
    source,
  };

  let mut source = Source::new(data);
  let mut attributes = vec![];
  while !source.is_empty() {
    let key = source.read_var_bytes().map_err(truncated)?;
    let value_type = source.read_var_bytes().map_err(truncated)?;
    let value = source.read_var_bytes().map_err(truncated)?;
    attributes.push(Attribute::new(key, value, value_type));
  }
  attributes.reverse();
  Ok(attributes)
}

/// Decodes a complete document returned by a `getDDO` query for `id`.
pub fn decode_ddo(id: &str, data: &[u8]) -> Result<Ddo, Error> {
  let mut source = Source::new(data);

  let owners = decode_public_keys(id, section(&mut source, "owners")?)?;
  let attributes = decode_attributes(section(&mut source, "attributes")?)?;

  let recovery = match section(&mut source, "recovery")? {
    [] => None,
    bytes => Some(Address::from_slice(bytes).map_err(|source| {
      Error::AddressDecode {
        section: "recovery",
        source,
      }
    })?),
  };

  debug!(
    "decoded document {id}: {} keys, {} attributes",
    owners.len(),
    attributes.len()
  );

  Ok(Ddo {
    id: id.to_owned(),
    owners,
    attributes,
    recovery,
  })
}
