use {
  crate::{program, PublicKey},
  multihash::{Hasher, Sha2_256},
  ripemd::{Digest, Ripemd160},
  serde::{Deserialize, Serialize},
  std::{
    fmt::{Debug, Display},
    ops::Deref,
    str::FromStr,
  },
  thiserror::Error,
};

/// Version byte prepended to an address before base58check encoding.
const ADDRESS_VERSION: u8 = 0x17;

#[derive(Debug, Error)]
pub enum Error {
  #[error("Invalid base58 address: {0}")]
  Base58(#[from] bs58::decode::Error),

  #[error("Invalid hex address: {0}")]
  Hex(#[from] hex::FromHexError),

  #[error("Address must be {expected} bytes, got {actual}")]
  InvalidLength { expected: usize, actual: usize },
}

/// Represents the 20-byte address of an account or a contract.
///
/// Addresses of externally owned accounts are the hash of the witness
/// program that verifies their signatures, so an address can be derived
/// from a public key but never the other way around. Contract addresses
/// are assigned by the chain; native contracts live at small fixed
/// addresses such as `0x02` for the gas token.
///
/// The textual form is base58check with a version byte of `0x17`. The hex
/// form is byte-reversed, matching how node RPC endpoints print
/// addresses.
#[derive(
  Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Address([u8; Address::LEN]);

impl Address {
  pub const LEN: usize = 20;

  /// The all-zero address. A transaction with this payer has no fee
  /// payer assigned yet.
  pub const EMPTY: Address = Address([0u8; Address::LEN]);

  pub const fn new(bytes: [u8; Address::LEN]) -> Self {
    Self(bytes)
  }

  pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
    let bytes: [u8; Address::LEN] =
      bytes.try_into().map_err(|_| Error::InvalidLength {
        expected: Address::LEN,
        actual: bytes.len(),
      })?;
    Ok(Self(bytes))
  }

  /// Parses the byte-reversed hex form, e.g. the gas contract is
  /// `0200000000000000000000000000000000000000`.
  pub fn from_hex(s: &str) -> Result<Self, Error> {
    let mut bytes = hex::decode(s)?;
    bytes.reverse();
    Self::from_slice(&bytes)
  }

  pub fn to_hex(&self) -> String {
    let mut bytes = self.0;
    bytes.reverse();
    hex::encode(bytes)
  }

  pub fn to_base58(&self) -> String {
    let mut versioned = [0u8; Address::LEN + 1];
    versioned[0] = ADDRESS_VERSION;
    versioned[1..].copy_from_slice(&self.0);
    bs58::encode(versioned).with_check().into_string()
  }

  /// Address of the single-key account controlled by `key`.
  pub fn from_public_key(key: &PublicKey) -> Self {
    let script = program::verification_script(key);
    let mut sha = Sha2_256::default();
    sha.update(&script);
    let digest = Ripemd160::digest(sha.finalize());
    let mut bytes = [0u8; Address::LEN];
    bytes.copy_from_slice(&digest);
    Self(bytes)
  }

  pub fn is_empty(&self) -> bool {
    *self == Self::EMPTY
  }
}

impl AsRef<[u8]> for Address {
  fn as_ref(&self) -> &[u8] {
    &self.0
  }
}

impl Deref for Address {
  type Target = [u8];

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl Display for Address {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.to_base58())
  }
}

impl Debug for Address {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "address({})", self.to_base58())
  }
}

impl From<Address> for String {
  fn from(addr: Address) -> Self {
    addr.to_base58()
  }
}

impl FromStr for Address {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let decoded = bs58::decode(s)
      .with_check(Some(ADDRESS_VERSION))
      .into_vec()?;
    match decoded.split_first() {
      Some((_, bytes)) => Self::from_slice(bytes),
      None => Err(Error::InvalidLength {
        expected: Address::LEN,
        actual: 0,
      }),
    }
  }
}

impl TryFrom<&str> for Address {
  type Error = Error;

  fn try_from(value: &str) -> Result<Self, Self::Error> {
    FromStr::from_str(value)
  }
}

impl From<&PublicKey> for Address {
  fn from(key: &PublicKey) -> Self {
    Self::from_public_key(key)
  }
}

#[cfg(test)]
mod tests {
  use super::{Address, Error};

  #[test]
  fn hex_form_is_byte_reversed() {
    let gas = Address::from_hex("0200000000000000000000000000000000000000")
      .unwrap();
    let mut expected = [0u8; 20];
    expected[19] = 0x02;
    assert_eq!(gas, Address::new(expected));
    assert_eq!(gas.to_hex(), "0200000000000000000000000000000000000000");
  }

  #[test]
  fn base58_roundtrip() {
    let addr = Address::new([0xD2; 20]);
    let text = addr.to_string();
    assert!(text.starts_with('A'), "{text}");
    assert_eq!(text.parse::<Address>().unwrap(), addr);
  }

  #[test]
  fn base58_checksum_is_verified() {
    let mut text = Address::new([0x42; 20]).to_string();
    let last = text.pop().unwrap();
    text.push(if last == '1' { '2' } else { '1' });
    assert!(matches!(text.parse::<Address>(), Err(Error::Base58(_))));
  }

  #[test]
  fn wrong_length() {
    assert!(matches!(
      Address::from_slice(&[1, 2, 3]),
      Err(Error::InvalidLength {
        expected: 20,
        actual: 3
      })
    ));
  }
}
