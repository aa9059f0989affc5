use {
  crate::{
    codec::{self, Sink, Source},
    program,
    signer::{Error as SignerError, Signer},
    Address,
    PublicKey,
  },
  multihash::{Hasher, Sha2_256},
  serde::{Deserialize, Serialize},
  std::fmt::{Debug, Display},
  thiserror::Error,
  tracing::debug,
};

/// Only transaction format version understood by the chain.
pub const TX_VERSION: u8 = 0;

/// Upper bound on the number of witnesses a transaction may carry.
pub const MAX_WITNESSES: usize = 16;

#[derive(Debug, Error)]
pub enum Error {
  #[error("Malformed transaction: {0}")]
  Codec(#[from] codec::Error),

  #[error("Unsupported transaction version {0}")]
  UnsupportedVersion(u8),

  #[error("Unsupported transaction type {0:#04x}")]
  UnsupportedType(u8),

  #[error("Unsupported VM type {0}")]
  UnsupportedVmType(u8),

  #[error("Transaction attributes are not supported (found {0})")]
  UnsupportedAttributes(u64),

  #[error("Witness #{0} is not a single-key program")]
  UnsupportedWitness(usize),

  #[error("Invalid witness public key: {0}")]
  WitnessKey(#[from] crate::keys::Error),

  #[error("Too many witnesses, at most 16 are allowed")]
  TooManyWitnesses,

  #[error("{count} trailing bytes after transaction at offset {offset}")]
  TrailingBytes { offset: usize, count: usize },

  #[error(transparent)]
  Signer(#[from] SignerError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TxType {
  Deploy = 0xD0,
  Invoke = 0xD1,
}

impl TryFrom<u8> for TxType {
  type Error = Error;

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      0xD0 => Ok(TxType::Deploy),
      0xD1 => Ok(TxType::Invoke),
      other => Err(Error::UnsupportedType(other)),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum VmType {
  NeoVm = 1,
  Wasm = 3,
}

impl TryFrom<u8> for VmType {
  type Error = Error;

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      1 => Ok(VmType::NeoVm),
      3 => Ok(VmType::Wasm),
      other => Err(Error::UnsupportedVmType(other)),
    }
  }
}

/// Code and metadata of a contract being deployed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployCode {
  pub code: Vec<u8>,
  pub vm_type: VmType,
  pub name: String,
  pub version: String,
  pub author: String,
  pub email: String,
  pub description: String,
}

impl DeployCode {
  fn encode(&self, sink: &mut Sink) {
    sink
      .write_var_bytes(&self.code)
      .write_u8(self.vm_type as u8)
      .write_var_str(&self.name)
      .write_var_str(&self.version)
      .write_var_str(&self.author)
      .write_var_str(&self.email)
      .write_var_str(&self.description);
  }

  fn decode(source: &mut Source<'_>) -> Result<Self, Error> {
    Ok(Self {
      code: source.read_var_bytes()?.to_vec(),
      vm_type: source.read_u8()?.try_into()?,
      name: source.read_var_string()?,
      version: source.read_var_string()?,
      author: source.read_var_string()?,
      email: source.read_var_string()?,
      description: source.read_var_string()?,
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
  /// Invocation script executed by the VM.
  Invoke(Vec<u8>),
  Deploy(DeployCode),
}

impl Payload {
  pub fn tx_type(&self) -> TxType {
    match self {
      Payload::Invoke(_) => TxType::Invoke,
      Payload::Deploy(_) => TxType::Deploy,
    }
  }

  /// The invocation script, for invoke transactions.
  pub fn code(&self) -> Option<&[u8]> {
    match self {
      Payload::Invoke(code) => Some(code),
      Payload::Deploy(_) => None,
    }
  }
}

/// A signature authorizing a transaction together with the key that
/// verifies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
  pub public_key: PublicKey,
  pub signature: Vec<u8>,
}

/// Double SHA-256 of the unsigned part of a transaction.
#[derive(
  Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TxHash([u8; 32]);

impl TxHash {
  pub fn as_bytes(&self) -> &[u8; 32] {
    &self.0
  }
}

impl AsRef<[u8]> for TxHash {
  fn as_ref(&self) -> &[u8] {
    &self.0
  }
}

/// Printed byte-reversed, the way block explorers show transaction ids.
impl Display for TxHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let mut bytes = self.0;
    bytes.reverse();
    write!(f, "{}", hex::encode(bytes))
  }
}

impl Debug for TxHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "txhash({self})")
  }
}

/// A transaction under assembly.
///
/// Header fields may be adjusted freely until the first signature is
/// collected; every signer signs the hash of the header and payload, so
/// changing them afterwards invalidates the witnesses already present.
/// Witnesses are kept in the order the signers were applied, which is
/// the order the chain checks them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
  pub version: u8,
  pub nonce: u32,
  pub gas_price: u64,
  pub gas_limit: u64,

  /// Account charged for gas. Left empty until a fee-paying signer signs,
  /// unless set explicitly.
  pub payer: Address,
  pub payload: Payload,
  witnesses: Vec<Witness>,
}

impl Transaction {
  pub fn new(gas_price: u64, gas_limit: u64, payload: Payload) -> Self {
    Self {
      version: TX_VERSION,
      nonce: time::OffsetDateTime::now_utc().unix_timestamp() as u32,
      gas_price,
      gas_limit,
      payer: Address::EMPTY,
      payload,
      witnesses: vec![],
    }
  }

  pub fn new_invoke(
    gas_price: u64,
    gas_limit: u64,
    code: impl Into<Vec<u8>>,
  ) -> Self {
    Self::new(gas_price, gas_limit, Payload::Invoke(code.into()))
  }

  pub fn new_deploy(gas_price: u64, gas_limit: u64, code: DeployCode) -> Self {
    Self::new(gas_price, gas_limit, Payload::Deploy(code))
  }

  pub fn with_nonce(mut self, nonce: u32) -> Self {
    self.nonce = nonce;
    self
  }

  pub fn with_payer(mut self, payer: Address) -> Self {
    self.payer = payer;
    self
  }

  pub fn tx_type(&self) -> TxType {
    self.payload.tx_type()
  }

  pub fn witnesses(&self) -> &[Witness] {
    &self.witnesses
  }

  fn encode_unsigned(&self, sink: &mut Sink) {
    sink
      .write_u8(self.version)
      .write_u8(self.tx_type() as u8)
      .write_u32(self.nonce)
      .write_u64(self.gas_price)
      .write_u64(self.gas_limit)
      .write_address(&self.payer);
    match &self.payload {
      Payload::Invoke(code) => {
        sink.write_var_bytes(code);
      }
      Payload::Deploy(deploy) => deploy.encode(sink),
    }
    // attributes
    sink.write_var_uint(0);
  }

  /// Hash of the header and payload. Witnesses are not covered.
  pub fn hash(&self) -> TxHash {
    let mut sink = Sink::new();
    self.encode_unsigned(&mut sink);

    let mut first = Sha2_256::default();
    first.update(sink.as_bytes());
    let mut second = Sha2_256::default();
    second.update(first.finalize());

    let mut hash = [0u8; 32];
    hash.copy_from_slice(second.finalize());
    TxHash(hash)
  }

  /// Collects a signature from `signer` and appends it as the next
  /// witness.
  ///
  /// When the transaction has no payer and no witnesses yet and the
  /// signer is a fee-paying account, it becomes the payer before the hash
  /// is computed. Once a witness exists the hashed fields are frozen, so
  /// every earlier signature stays valid. Signing twice with the same
  /// identity appends a second witness.
  pub fn sign(&mut self, signer: &impl Signer) -> Result<(), Error> {
    if self.witnesses.len() >= MAX_WITNESSES {
      return Err(Error::TooManyWitnesses);
    }

    if self.payer.is_empty() {
      match signer.payer() {
        Some(payer) if self.witnesses.is_empty() => self.payer = payer,
        Some(payer) => debug!(
          "not assigning payer {payer} after {} witnesses",
          self.witnesses.len()
        ),
        None => {}
      }
    }

    let hash = self.hash();
    let signature = signer.sign(hash.as_ref())?;
    debug!(
      "signed transaction {hash} as witness #{} by {:?}",
      self.witnesses.len(),
      signer.public_key()
    );

    self.witnesses.push(Witness {
      public_key: signer.public_key().clone(),
      signature,
    });
    Ok(())
  }

  /// Appends a signature produced outside of a [`Signer`], for example
  /// by an offline wallet that was handed [`Transaction::hash`].
  pub fn append_witness(&mut self, witness: Witness) -> Result<(), Error> {
    if self.witnesses.len() >= MAX_WITNESSES {
      return Err(Error::TooManyWitnesses);
    }
    self.witnesses.push(witness);
    Ok(())
  }

  pub fn to_bytes(&self) -> Vec<u8> {
    let mut sink = Sink::new();
    self.encode_unsigned(&mut sink);
    sink.write_var_uint(self.witnesses.len() as u64);
    for witness in &self.witnesses {
      sink
        .write_var_bytes(&program::invocation_script(&witness.signature))
        .write_var_bytes(&program::verification_script(&witness.public_key));
    }
    sink.into_bytes()
  }

  /// Freezes the transaction into its broadcastable form.
  pub fn into_immutable(self) -> SignedTransaction {
    let bytes = self.to_bytes();
    let hash = self.hash();
    debug!(
      "sealed transaction {hash}: {} bytes, {} witnesses",
      bytes.len(),
      self.witnesses.len()
    );
    SignedTransaction {
      transaction: self,
      bytes,
      hash,
    }
  }

  pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
    let mut source = Source::new(bytes);

    let version = source.read_u8()?;
    if version != TX_VERSION {
      return Err(Error::UnsupportedVersion(version));
    }
    let tx_type = TxType::try_from(source.read_u8()?)?;
    let nonce = source.read_u32()?;
    let gas_price = source.read_u64()?;
    let gas_limit = source.read_u64()?;
    let payer = source.read_address()?;
    let payload = match tx_type {
      TxType::Invoke => Payload::Invoke(source.read_var_bytes()?.to_vec()),
      TxType::Deploy => Payload::Deploy(DeployCode::decode(&mut source)?),
    };

    let attributes = source.read_var_uint()?;
    if attributes != 0 {
      return Err(Error::UnsupportedAttributes(attributes));
    }

    let count = source.read_var_uint()?;
    if count > MAX_WITNESSES as u64 {
      return Err(Error::TooManyWitnesses);
    }

    let mut witnesses = Vec::with_capacity(count as usize);
    for index in 0..count as usize {
      let invocation = source.read_var_bytes()?;
      let verification = source.read_var_bytes()?;
      let signature = program::signature_from_invocation(invocation)?
        .ok_or(Error::UnsupportedWitness(index))?;
      let key = program::key_from_verification(verification)?
        .ok_or(Error::UnsupportedWitness(index))?;
      witnesses.push(Witness {
        public_key: PublicKey::from_bytes(key)?,
        signature: signature.to_vec(),
      });
    }

    if !source.is_empty() {
      return Err(Error::TrailingBytes {
        offset: source.position(),
        count: source.remaining(),
      });
    }

    Ok(Self {
      version,
      nonce,
      gas_price,
      gas_limit,
      payer,
      payload,
      witnesses,
    })
  }
}

/// A fully signed transaction, ready to be broadcast.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
  transaction: Transaction,
  bytes: Vec<u8>,
  hash: TxHash,
}

impl SignedTransaction {
  pub fn hash(&self) -> TxHash {
    self.hash
  }

  pub fn as_bytes(&self) -> &[u8] {
    &self.bytes
  }

  pub fn to_hex(&self) -> String {
    hex::encode(&self.bytes)
  }

  pub fn transaction(&self) -> &Transaction {
    &self.transaction
  }

  pub fn into_bytes(self) -> Vec<u8> {
    self.bytes
  }
}

#[cfg(test)]
mod tests {
  use {
    super::*,
    ed25519_dalek::{Keypair, SecretKey, Signer as _},
  };

  struct TestSigner {
    keypair: Keypair,
    public: PublicKey,
    pays: bool,
  }

  impl TestSigner {
    fn new(seed: u8, pays: bool) -> Self {
      let secret = SecretKey::from_bytes(&[seed; 32]).unwrap();
      let public = ed25519_dalek::PublicKey::from(&secret);
      Self {
        public: PublicKey::from(&public),
        keypair: Keypair { secret, public },
        pays,
      }
    }
  }

  impl Signer for TestSigner {
    fn public_key(&self) -> &PublicKey {
      &self.public
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
      Ok(self.keypair.sign(message).to_bytes().to_vec())
    }

    fn payer(&self) -> Option<Address> {
      self.pays.then(|| Address::from_public_key(&self.public))
    }
  }

  fn invoke() -> Transaction {
    Transaction::new_invoke(500, 20000, vec![0x00, 0x68]).with_nonce(7)
  }

  #[test]
  fn witness_order_follows_signing_order() {
    let x = TestSigner::new(1, true);
    let y = TestSigner::new(2, false);

    let mut xy = invoke();
    xy.sign(&x).unwrap();
    xy.sign(&y).unwrap();

    let mut yx = invoke().with_payer(Address::from_public_key(&x.public));
    yx.sign(&y).unwrap();
    yx.sign(&x).unwrap();

    assert_eq!(xy.hash(), yx.hash());
    assert_eq!(xy.witnesses()[0].public_key, x.public);
    assert_eq!(xy.witnesses()[1].public_key, y.public);
    assert_eq!(yx.witnesses()[0].public_key, y.public);
    assert_eq!(yx.witnesses()[1].public_key, x.public);
    assert_ne!(xy.to_bytes(), yx.to_bytes());
  }

  fn verifies(tx: &Transaction, witness: &Witness) -> bool {
    let key =
      ed25519_dalek::PublicKey::from_bytes(&witness.public_key.as_bytes()[2..])
        .unwrap();
    let signature =
      ed25519_dalek::Signature::try_from(witness.signature.as_slice()).unwrap();
    key.verify_strict(tx.hash().as_ref(), &signature).is_ok()
  }

  #[test]
  fn paying_signer_becomes_payer_only_when_first() {
    let account = TestSigner::new(4, true);
    let mut tx = invoke();
    tx.sign(&account).unwrap();
    assert_eq!(tx.payer, Address::from_public_key(&account.public));

    let other = TestSigner::new(5, true);
    tx.sign(&other).unwrap();
    assert_eq!(tx.payer, Address::from_public_key(&account.public));

    let controller = TestSigner::new(3, false);
    let mut tx = invoke();
    tx.sign(&controller).unwrap();
    tx.sign(&account).unwrap();
    assert!(tx.payer.is_empty());
  }

  #[test]
  fn earlier_witnesses_stay_valid_in_any_order() {
    let controller = TestSigner::new(3, false);
    let account = TestSigner::new(4, true);

    let mut first = invoke();
    first.sign(&account).unwrap();
    first.sign(&controller).unwrap();

    let mut second = invoke();
    second.sign(&controller).unwrap();
    second.sign(&account).unwrap();

    for tx in [&first, &second] {
      assert_eq!(tx.witnesses().len(), 2);
      for witness in tx.witnesses() {
        assert!(verifies(tx, witness));
      }
    }
  }

  #[test]
  fn duplicate_signing_appends_witness() {
    let signer = TestSigner::new(6, true);
    let mut tx = invoke();
    tx.sign(&signer).unwrap();
    tx.sign(&signer).unwrap();
    assert_eq!(tx.witnesses().len(), 2);
    assert_eq!(tx.witnesses()[0], tx.witnesses()[1]);
  }

  #[test]
  fn witness_limit() {
    let signer = TestSigner::new(8, true);
    let mut tx = invoke();
    for _ in 0..MAX_WITNESSES {
      tx.sign(&signer).unwrap();
    }
    assert!(matches!(tx.sign(&signer), Err(Error::TooManyWitnesses)));
  }

  #[test]
  fn serialization_is_deterministic_and_reversible() {
    let signer = TestSigner::new(9, true);
    let mut a = invoke();
    let mut b = invoke();
    a.sign(&signer).unwrap();
    b.sign(&signer).unwrap();

    let a = a.into_immutable();
    let b = b.into_immutable();
    assert_eq!(a.as_bytes(), b.as_bytes());
    assert_eq!(a.hash(), b.hash());

    let bytes = a.as_bytes();
    assert_eq!(bytes[0], TX_VERSION);
    assert_eq!(bytes[1], 0xD1);
    assert_eq!(&bytes[2..6], &7u32.to_le_bytes());

    let decoded = Transaction::deserialize(bytes).unwrap();
    assert_eq!(&decoded, a.transaction());
    assert_eq!(decoded.hash(), a.hash());
  }

  #[test]
  fn deploy_payload_roundtrip() {
    let tx = Transaction::new_deploy(0, 20000, DeployCode {
      code: vec![0x51, 0x66],
      vm_type: VmType::NeoVm,
      name: "name".into(),
      version: "1.0".into(),
      author: "author".into(),
      email: "author@example.com".into(),
      description: "desc".into(),
    })
    .with_nonce(1);

    let bytes = tx.to_bytes();
    assert_eq!(bytes[1], 0xD0);
    assert_eq!(Transaction::deserialize(&bytes).unwrap(), tx);
  }

  #[test]
  fn rejects_malformed_transactions() {
    let bytes = invoke().to_bytes();

    let mut trailing = bytes.clone();
    trailing.push(0);
    assert!(matches!(
      Transaction::deserialize(&trailing),
      Err(Error::TrailingBytes { count: 1, .. })
    ));

    let mut unknown = bytes.clone();
    unknown[1] = 0xD2;
    assert!(matches!(
      Transaction::deserialize(&unknown),
      Err(Error::UnsupportedType(0xD2))
    ));

    assert!(matches!(
      Transaction::deserialize(&bytes[..bytes.len() - 3]),
      Err(Error::Codec(codec::Error::TruncatedInput { .. }))
    ));
  }

  #[test]
  fn hash_display_is_reversed() {
    let mut raw = [0u8; 32];
    raw[0] = 0xAB;
    let hash = TxHash(raw);
    assert!(hash.to_string().ends_with("ab"));
    assert!(hash.to_string().starts_with("00"));
  }
}
