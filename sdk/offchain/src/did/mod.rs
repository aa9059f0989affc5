mod ddo;

use {
  crate::{
    native::{seal, NativeContract},
    Account,
    ContractRef,
    Controller,
    Error,
  },
  dna_primitives::{Address, PublicKey, SignedTransaction, Signer, Transaction},
  dna_vm::{CallArgument, InvocationScript},
};

pub use ddo::{decode_attributes, decode_ddo, decode_public_keys, Attribute, Ddo, Owner};

fn key_argument(key: &PublicKey) -> CallArgument {
  key.as_bytes().into()
}

fn attributes_argument(attributes: &[Attribute]) -> CallArgument {
  CallArgument::List(attributes.iter().map(CallArgument::from).collect())
}

/// Registration and maintenance of decentralized identities.
///
/// Changes to an existing document carry two witnesses: the fee payer
/// signs first, then the controller whose key authorizes the change.
pub struct Did<'a> {
  native: &'a NativeContract,
}

impl<'a> Did<'a> {
  pub(crate) fn new(native: &'a NativeContract) -> Self {
    Self { native }
  }

  fn contract(&self) -> ContractRef {
    self.native.config().did_contract
  }

  fn invoke(
    &self,
    gas_price: u64,
    gas_limit: u64,
    method: &str,
    args: &[CallArgument],
  ) -> Result<Transaction, Error> {
    self
      .native
      .invoke(self.contract(), gas_price, gas_limit, method, args)
  }

  /// Sets the method name of identities managed by the contract, e.g.
  /// `dna` for `did:dna:...`.
  pub fn new_init_did_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    did_method: &str,
  ) -> Result<Transaction, Error> {
    self.invoke(gas_price, gas_limit, "initDID", &[did_method
      .as_bytes()
      .into()])
  }

  pub fn new_reg_id_with_public_key_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    id: &str,
    key: &PublicKey,
  ) -> Result<Transaction, Error> {
    self.invoke(gas_price, gas_limit, "regIDWithPublicKey", &[
      CallArgument::record([("id", id.into()), ("key", key_argument(key))]),
    ])
  }

  pub fn new_reg_id_with_attributes_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    id: &str,
    key: &PublicKey,
    attributes: &[Attribute],
  ) -> Result<Transaction, Error> {
    self.invoke(gas_price, gas_limit, "regIDWithAttributes", &[
      CallArgument::record([
        ("id", id.into()),
        ("key", key_argument(key)),
        ("attributes", attributes_argument(attributes)),
      ]),
    ])
  }

  pub fn new_add_key_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    id: &str,
    new_key: &PublicKey,
    key: &PublicKey,
  ) -> Result<Transaction, Error> {
    self.invoke(gas_price, gas_limit, "addKey", &[CallArgument::record([
      ("id", id.into()),
      ("new_key", key_argument(new_key)),
      ("key", key_argument(key)),
    ])])
  }

  pub fn new_remove_key_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    id: &str,
    removed_key: &PublicKey,
    key: &PublicKey,
  ) -> Result<Transaction, Error> {
    self.invoke(gas_price, gas_limit, "removeKey", &[CallArgument::record([
      ("id", id.into()),
      ("removed_key", key_argument(removed_key)),
      ("key", key_argument(key)),
    ])])
  }

  pub fn new_add_recovery_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    id: &str,
    recovery: Address,
    key: &PublicKey,
  ) -> Result<Transaction, Error> {
    self.invoke(gas_price, gas_limit, "addRecovery", &[CallArgument::record(
      [
        ("id", id.into()),
        ("recovery", recovery.into()),
        ("key", key_argument(key)),
      ],
    )])
  }

  pub fn new_change_recovery_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    id: &str,
    new_recovery: Address,
    old_recovery: Address,
  ) -> Result<Transaction, Error> {
    self.invoke(gas_price, gas_limit, "changeRecovery", &[
      CallArgument::record([
        ("id", id.into()),
        ("new_recovery", new_recovery.into()),
        ("old_recovery", old_recovery.into()),
      ]),
    ])
  }

  pub fn new_add_attributes_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    id: &str,
    attributes: &[Attribute],
    key: &PublicKey,
  ) -> Result<Transaction, Error> {
    self.invoke(gas_price, gas_limit, "addAttributes", &[
      CallArgument::record([
        ("id", id.into()),
        ("attributes", attributes_argument(attributes)),
        ("key", key_argument(key)),
      ]),
    ])
  }

  pub fn new_remove_attribute_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    id: &str,
    attribute_key: &[u8],
    key: &PublicKey,
  ) -> Result<Transaction, Error> {
    self.invoke(gas_price, gas_limit, "removeAttribute", &[
      CallArgument::record([
        ("id", id.into()),
        ("attribute_key", attribute_key.into()),
        ("key", key_argument(key)),
      ]),
    ])
  }

  pub fn init_did(
    &self,
    gas_price: u64,
    gas_limit: u64,
    signer: &Account,
    did_method: &str,
  ) -> Result<SignedTransaction, Error> {
    let tx = self.new_init_did_transaction(gas_price, gas_limit, did_method)?;
    seal(tx, &[signer])
  }

  /// Registers the controller's identity with the controller's key as its
  /// first owner.
  pub fn reg_id_with_public_key(
    &self,
    gas_price: u64,
    gas_limit: u64,
    payer: &Account,
    controller: &Controller,
  ) -> Result<SignedTransaction, Error> {
    let tx = self.new_reg_id_with_public_key_transaction(
      gas_price,
      gas_limit,
      controller.id(),
      controller.public_key(),
    )?;
    seal(tx, &[payer, controller])
  }

  pub fn reg_id_with_attributes(
    &self,
    gas_price: u64,
    gas_limit: u64,
    payer: &Account,
    controller: &Controller,
    attributes: &[Attribute],
  ) -> Result<SignedTransaction, Error> {
    let tx = self.new_reg_id_with_attributes_transaction(
      gas_price,
      gas_limit,
      controller.id(),
      controller.public_key(),
      attributes,
    )?;
    seal(tx, &[payer, controller])
  }

  pub fn add_key(
    &self,
    gas_price: u64,
    gas_limit: u64,
    payer: &Account,
    new_key: &PublicKey,
    controller: &Controller,
  ) -> Result<SignedTransaction, Error> {
    let tx = self.new_add_key_transaction(
      gas_price,
      gas_limit,
      controller.id(),
      new_key,
      controller.public_key(),
    )?;
    seal(tx, &[payer, controller])
  }

  pub fn remove_key(
    &self,
    gas_price: u64,
    gas_limit: u64,
    payer: &Account,
    removed_key: &PublicKey,
    controller: &Controller,
  ) -> Result<SignedTransaction, Error> {
    let tx = self.new_remove_key_transaction(
      gas_price,
      gas_limit,
      controller.id(),
      removed_key,
      controller.public_key(),
    )?;
    seal(tx, &[payer, controller])
  }

  pub fn add_recovery(
    &self,
    gas_price: u64,
    gas_limit: u64,
    payer: &Account,
    recovery: Address,
    controller: &Controller,
  ) -> Result<SignedTransaction, Error> {
    let tx = self.new_add_recovery_transaction(
      gas_price,
      gas_limit,
      controller.id(),
      recovery,
      controller.public_key(),
    )?;
    seal(tx, &[payer, controller])
  }

  /// Replaces the recovery address. The change is authorized by the
  /// current recovery account, which signs as `controller`.
  pub fn change_recovery(
    &self,
    gas_price: u64,
    gas_limit: u64,
    payer: &Account,
    new_recovery: Address,
    old_recovery: Address,
    controller: &Controller,
  ) -> Result<SignedTransaction, Error> {
    let tx = self.new_change_recovery_transaction(
      gas_price,
      gas_limit,
      controller.id(),
      new_recovery,
      old_recovery,
    )?;
    seal(tx, &[payer, controller])
  }

  pub fn add_attributes(
    &self,
    gas_price: u64,
    gas_limit: u64,
    payer: &Account,
    attributes: &[Attribute],
    controller: &Controller,
  ) -> Result<SignedTransaction, Error> {
    let tx = self.new_add_attributes_transaction(
      gas_price,
      gas_limit,
      controller.id(),
      attributes,
      controller.public_key(),
    )?;
    seal(tx, &[payer, controller])
  }

  pub fn remove_attribute(
    &self,
    gas_price: u64,
    gas_limit: u64,
    payer: &Account,
    attribute_key: &[u8],
    controller: &Controller,
  ) -> Result<SignedTransaction, Error> {
    let tx = self.new_remove_attribute_transaction(
      gas_price,
      gas_limit,
      controller.id(),
      attribute_key,
      controller.public_key(),
    )?;
    seal(tx, &[payer, controller])
  }

  /// Transaction asking the contract whether `controller` holds the key at
  /// `key_index` of its document. Meant for pre-execution, so it pays no
  /// gas and carries only the controller's witness.
  pub fn verify_signature(
    &self,
    controller: &Controller,
    key_index: u32,
  ) -> Result<SignedTransaction, Error> {
    let tx = self.invoke(0, 0, "verifySignature", &[
      controller.id().into(),
      (key_index as u64).into(),
    ])?;
    seal(tx, &[controller])
  }

  pub fn get_ddo_invocation(&self, id: &str) -> Result<InvocationScript, Error> {
    self
      .native
      .query_invocation(self.contract(), "getDDO", &[id.into()])
  }

  pub fn get_public_keys_invocation(
    &self,
    id: &str,
  ) -> Result<InvocationScript, Error> {
    self
      .native
      .query_invocation(self.contract(), "getPublicKeys", &[id.into()])
  }

  pub fn get_attributes_invocation(
    &self,
    id: &str,
  ) -> Result<InvocationScript, Error> {
    self
      .native
      .query_invocation(self.contract(), "getAttributes", &[id.into()])
  }

  pub fn get_key_state_invocation(
    &self,
    id: &str,
    key_index: u32,
  ) -> Result<InvocationScript, Error> {
    self.native.query_invocation(self.contract(), "getKeyState", &[
      CallArgument::record([
        ("id", id.into()),
        ("key_index", (key_index as u64).into()),
      ]),
    ])
  }
}
