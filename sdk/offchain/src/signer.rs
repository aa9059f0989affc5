use {
  crate::Error,
  dna_primitives::{Address, PublicKey, Signer, SignerError},
  ed25519_dalek::{Keypair, SecretKey, Signer as _},
  std::fmt::Debug,
};

/// Signature scheme id of Ed25519 over SHA-512, prepended to every
/// serialized signature.
pub const SHA512_WITH_EDDSA: u8 = 0x0A;

fn keypair_from_secret(secret: &[u8]) -> Result<Keypair, Error> {
  let secret = SecretKey::from_bytes(secret)?;
  let public = (&secret).into();
  Ok(Keypair { secret, public })
}

fn sign_eddsa(keypair: &Keypair, message: &[u8]) -> Vec<u8> {
  let mut signature = Vec::with_capacity(65);
  signature.push(SHA512_WITH_EDDSA);
  signature.extend_from_slice(&keypair.sign(message).to_bytes());
  signature
}

/// A fee-paying account controlled by a single Ed25519 key.
pub struct Account {
  keypair: Keypair,
  public_key: PublicKey,
  address: Address,
}

impl Account {
  pub fn from_keypair(keypair: Keypair) -> Self {
    let public_key = PublicKey::from(&keypair.public);
    let address = Address::from_public_key(&public_key);
    Self {
      keypair,
      public_key,
      address,
    }
  }

  pub fn from_secret(secret: &[u8]) -> Result<Self, Error> {
    Ok(Self::from_keypair(keypair_from_secret(secret)?))
  }

  pub fn generate() -> Self {
    Self::from_keypair(Keypair::generate(&mut rand::rngs::OsRng))
  }

  pub fn address(&self) -> Address {
    self.address
  }
}

impl Signer for Account {
  fn public_key(&self) -> &PublicKey {
    &self.public_key
  }

  fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
    Ok(sign_eddsa(&self.keypair, message))
  }

  fn payer(&self) -> Option<Address> {
    Some(self.address)
  }
}

impl Debug for Account {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Account")
      .field("address", &self.address)
      .field("public_key", &self.public_key)
      .finish()
  }
}

/// One of the keys listed in a DID document, authorizing changes to the
/// document on behalf of its owner.
///
/// A controller never pays for the transactions it signs. `index` is the
/// position of its key in the document and is checked on chain only.
pub struct Controller {
  id: String,
  index: u32,
  keypair: Keypair,
  public_key: PublicKey,
}

impl Controller {
  pub fn from_keypair(
    id: impl Into<String>,
    index: u32,
    keypair: Keypair,
  ) -> Self {
    Self {
      id: id.into(),
      index,
      public_key: PublicKey::from(&keypair.public),
      keypair,
    }
  }

  pub fn from_secret(
    id: impl Into<String>,
    index: u32,
    secret: &[u8],
  ) -> Result<Self, Error> {
    Ok(Self::from_keypair(id, index, keypair_from_secret(secret)?))
  }

  pub fn generate(id: impl Into<String>, index: u32) -> Self {
    Self::from_keypair(id, index, Keypair::generate(&mut rand::rngs::OsRng))
  }

  /// The DID this controller acts for.
  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn index(&self) -> u32 {
    self.index
  }
}

impl Signer for Controller {
  fn public_key(&self) -> &PublicKey {
    &self.public_key
  }

  fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
    Ok(sign_eddsa(&self.keypair, message))
  }
}

impl Debug for Controller {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Controller")
      .field("id", &self.id)
      .field("index", &self.index)
      .field("public_key", &self.public_key)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use {
    super::*,
    ed25519_dalek::{Signature, Verifier},
  };

  #[test]
  fn signatures_are_scheme_tagged() {
    let account = Account::from_secret(&[3u8; 32]).unwrap();
    let signature = account.sign(b"message").unwrap();
    assert_eq!(signature.len(), 65);
    assert_eq!(signature[0], SHA512_WITH_EDDSA);

    let raw = Signature::try_from(&signature[1..]).unwrap();
    assert!(account.keypair.public.verify(b"message", &raw).is_ok());
  }

  #[test]
  fn only_accounts_pay() {
    let account = Account::from_secret(&[1u8; 32]).unwrap();
    let controller =
      Controller::from_secret("did:dna:x", 1, &[1u8; 32]).unwrap();
    assert_eq!(account.payer(), Some(account.address()));
    assert_eq!(controller.payer(), None);
    assert_eq!(account.public_key(), controller.public_key());
  }

  #[test]
  fn rejects_short_secret() {
    assert!(matches!(
      Account::from_secret(&[1u8; 31]),
      Err(Error::InvalidSecretKey(_))
    ));
  }
}
