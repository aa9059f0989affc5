use {
  serde::{Deserialize, Serialize},
  std::fmt::{Debug, Display},
  thiserror::Error,
};

const PK_ECDSA: u8 = 0x12;
const PK_SM2: u8 = 0x13;
const PK_EDDSA: u8 = 0x14;

const COMPRESSED_EVEN: u8 = 0x02;
const COMPRESSED_ODD: u8 = 0x03;
const UNCOMPRESSED: u8 = 0x04;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("Unknown public key encoding (length {len}, prefix {prefix:?})")]
  UnknownKeyEncoding { len: usize, prefix: Option<u8> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
  Ecdsa,
  Sm2,
  EdDsa,
}

impl Display for KeyType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(match self {
      KeyType::Ecdsa => "ECDSA",
      KeyType::Sm2 => "SM2",
      KeyType::EdDsa => "EDDSA",
    })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Curve {
  P224,
  P256,
  P384,
  P521,
  Sm2P256V1,
  Ed25519,
}

impl Curve {
  /// Curve identifiers as they appear in the second byte of tagged keys.
  const LABELS: [(u8, Curve); 6] = [
    (1, Curve::P224),
    (2, Curve::P256),
    (3, Curve::P384),
    (4, Curve::P521),
    (20, Curve::Sm2P256V1),
    (25, Curve::Ed25519),
  ];

  fn from_label(label: u8) -> Option<Self> {
    Self::LABELS
      .iter()
      .find(|(l, _)| *l == label)
      .map(|(_, c)| *c)
  }

  pub fn label(&self) -> u8 {
    match self {
      Curve::P224 => 1,
      Curve::P256 => 2,
      Curve::P384 => 3,
      Curve::P521 => 4,
      Curve::Sm2P256V1 => 20,
      Curve::Ed25519 => 25,
    }
  }

  /// Length of a compressed point on a short Weierstrass curve, or of the
  /// raw key for Edwards curves.
  fn point_len(&self) -> usize {
    match self {
      Curve::P224 => 29,
      Curve::P256 | Curve::Sm2P256V1 => 33,
      Curve::P384 => 49,
      Curve::P521 => 67,
      Curve::Ed25519 => 32,
    }
  }
}

impl Display for Curve {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(match self {
      Curve::P224 => "P-224",
      Curve::P256 => "P-256",
      Curve::P384 => "P-384",
      Curve::P521 => "P-521",
      Curve::Sm2P256V1 => "sm2p256v1",
      Curve::Ed25519 => "ed25519",
    })
  }
}

/// A serialized public key together with the algorithm and curve that
/// its encoding identifies.
///
/// The bytes are kept exactly as they appear on chain, so addresses and
/// witness programs derived from a key are stable regardless of how the
/// key was obtained.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey {
  key_type: KeyType,
  curve: Curve,
  compressed: bool,
  bytes: Vec<u8>,
}

impl PublicKey {
  /// Classifies serialized key bytes against the known encodings.
  pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
    let unknown = || Error::UnknownKeyEncoding {
      len: bytes.len(),
      prefix: bytes.first().copied(),
    };

    let (key_type, curve, compressed) = match bytes {
      [COMPRESSED_EVEN | COMPRESSED_ODD, rest @ ..] if rest.len() == 32 => {
        (KeyType::Ecdsa, Curve::P256, true)
      }
      [UNCOMPRESSED, rest @ ..] if rest.len() == 64 => {
        (KeyType::Ecdsa, Curve::P256, false)
      }
      [tag @ (PK_ECDSA | PK_SM2), label, point @ ..] => {
        let curve = Curve::from_label(*label).ok_or_else(unknown)?;
        let valid_curve = match *tag {
          PK_ECDSA => matches!(
            curve,
            Curve::P224 | Curve::P256 | Curve::P384 | Curve::P521
          ),
          _ => curve == Curve::Sm2P256V1,
        };
        let valid_point = point.len() == curve.point_len()
          && matches!(point[0], COMPRESSED_EVEN | COMPRESSED_ODD);
        if !valid_curve || !valid_point {
          return Err(unknown());
        }
        let key_type = match *tag {
          PK_ECDSA => KeyType::Ecdsa,
          _ => KeyType::Sm2,
        };
        (key_type, curve, true)
      }
      [PK_EDDSA, label, point @ ..]
        if Curve::from_label(*label) == Some(Curve::Ed25519)
          && point.len() == Curve::Ed25519.point_len() =>
      {
        (KeyType::EdDsa, Curve::Ed25519, true)
      }
      _ => return Err(unknown()),
    };

    Ok(Self {
      key_type,
      curve,
      compressed,
      bytes: bytes.to_vec(),
    })
  }

  pub fn key_type(&self) -> KeyType {
    self.key_type
  }

  pub fn curve(&self) -> Curve {
    self.curve
  }

  pub fn is_compressed(&self) -> bool {
    self.compressed
  }

  pub fn as_bytes(&self) -> &[u8] {
    &self.bytes
  }

  pub fn to_hex(&self) -> String {
    hex::encode(&self.bytes)
  }
}

impl From<&ed25519_dalek::PublicKey> for PublicKey {
  fn from(key: &ed25519_dalek::PublicKey) -> Self {
    let mut bytes = Vec::with_capacity(34);
    bytes.push(PK_EDDSA);
    bytes.push(Curve::Ed25519.label());
    bytes.extend_from_slice(key.as_bytes());
    Self {
      key_type: KeyType::EdDsa,
      curve: Curve::Ed25519,
      compressed: true,
      bytes,
    }
  }
}

impl AsRef<[u8]> for PublicKey {
  fn as_ref(&self) -> &[u8] {
    &self.bytes
  }
}

impl Debug for PublicKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "pubkey({}/{}, {})", self.key_type, self.curve, self.to_hex())
  }
}

#[cfg(test)]
mod tests {
  use super::{Curve, Error, KeyType, PublicKey};

  fn key(prefix: &[u8], point_len: usize, first: u8) -> Vec<u8> {
    let mut bytes = prefix.to_vec();
    bytes.push(first);
    bytes.extend(std::iter::repeat(0x11).take(point_len - 1));
    bytes
  }

  #[test]
  fn recognises_known_encodings() {
    let cases = [
      (key(&[], 33, 0x02), KeyType::Ecdsa, Curve::P256, true),
      (key(&[], 33, 0x03), KeyType::Ecdsa, Curve::P256, true),
      (key(&[], 65, 0x04), KeyType::Ecdsa, Curve::P256, false),
      (key(&[0x12, 1], 29, 0x02), KeyType::Ecdsa, Curve::P224, true),
      (key(&[0x12, 3], 49, 0x03), KeyType::Ecdsa, Curve::P384, true),
      (key(&[0x12, 4], 67, 0x02), KeyType::Ecdsa, Curve::P521, true),
      (key(&[0x13, 20], 33, 0x02), KeyType::Sm2, Curve::Sm2P256V1, true),
      (key(&[0x14, 25], 32, 0xAB), KeyType::EdDsa, Curve::Ed25519, true),
    ];

    for (bytes, key_type, curve, compressed) in cases {
      let pk = PublicKey::from_bytes(&bytes).unwrap();
      assert_eq!(pk.key_type(), key_type);
      assert_eq!(pk.curve(), curve);
      assert_eq!(pk.is_compressed(), compressed);
      assert_eq!(pk.as_bytes(), bytes.as_slice());
    }
  }

  #[test]
  fn rejects_unknown_encodings() {
    let cases = [
      vec![],
      key(&[], 32, 0x02),
      key(&[], 33, 0x05),
      key(&[0x12, 20], 33, 0x02),
      key(&[0x13, 2], 33, 0x02),
      key(&[0x12, 2], 32, 0x02),
      key(&[0x14, 25], 33, 0x00),
      key(&[0x15, 25], 32, 0x00),
    ];

    for bytes in cases {
      assert_eq!(
        PublicKey::from_bytes(&bytes),
        Err(Error::UnknownKeyEncoding {
          len: bytes.len(),
          prefix: bytes.first().copied()
        }),
        "{}",
        hex::encode(&bytes)
      );
    }
  }

  #[test]
  fn ed25519_keys_use_tagged_encoding() {
    let secret = ed25519_dalek::SecretKey::from_bytes(&[7u8; 32]).unwrap();
    let public = ed25519_dalek::PublicKey::from(&secret);
    let pk = PublicKey::from(&public);
    assert_eq!(&pk.as_bytes()[..2], &[0x14, 0x19]);
    assert_eq!(PublicKey::from_bytes(pk.as_bytes()).unwrap(), pk);
  }
}
