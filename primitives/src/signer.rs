use {
  crate::{Address, PublicKey},
  thiserror::Error,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Signer failure: {0}")]
pub struct Error(pub String);

/// An identity that can authorize transactions.
///
/// Implementations may hold keys in memory, delegate to a hardware
/// device or call out to a remote wallet; the transaction assembler only
/// needs the public key and a signature over the message it hands out.
pub trait Signer {
  fn public_key(&self) -> &PublicKey;

  /// Produces a signature over `message`, serialized the way witness
  /// programs expect it.
  fn sign(&self, message: &[u8]) -> Result<Vec<u8>, Error>;

  /// Address that pays fees when this identity is the first to sign a
  /// transaction that has no payer yet. Controllers of a DID document
  /// authorize changes but never pay for them.
  fn payer(&self) -> Option<Address> {
    None
  }
}

impl<S: Signer + ?Sized> Signer for &S {
  fn public_key(&self) -> &PublicKey {
    (**self).public_key()
  }

  fn sign(&self, message: &[u8]) -> Result<Vec<u8>, Error> {
    (**self).sign(message)
  }

  fn payer(&self) -> Option<Address> {
    (**self).payer()
  }
}
