use {
  super::{seal, NativeContract},
  crate::{Account, ContractRef, Error},
  dna_primitives::{Address, SignedTransaction, Transaction},
  dna_vm::CallArgument,
};

/// Role based access control for contracts, administered through DIDs.
///
/// Every administrative call names the target contract first and the
/// index of the caller's key in its DID document last.
pub struct Auth<'a> {
  native: &'a NativeContract,
}

impl<'a> Auth<'a> {
  pub(super) fn new(native: &'a NativeContract) -> Self {
    Self { native }
  }

  fn contract(&self) -> ContractRef {
    self.native.config().auth_contract
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

  /// Binds the auth contract to the DID contract currently configured.
  pub fn new_init_auth_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
  ) -> Result<Transaction, Error> {
    let did = self.native.config().did_contract.address;
    self.invoke(gas_price, gas_limit, "initAuth", &[did.to_vec().into()])
  }

  #[allow(clippy::too_many_arguments)]
  pub fn new_assign_funcs_to_role_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    contract: Address,
    admin_id: &[u8],
    role: &[u8],
    functions: &[&str],
    key_index: u32,
  ) -> Result<Transaction, Error> {
    let functions = functions.iter().map(|f| CallArgument::from(*f)).collect();
    self.invoke(gas_price, gas_limit, "assignFuncsToRole", &[
      contract.into(),
      admin_id.into(),
      role.into(),
      CallArgument::List(functions),
      (key_index as u64).into(),
    ])
  }

  #[allow(clippy::too_many_arguments)]
  pub fn new_delegate_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    contract: Address,
    from: &[u8],
    to: &[u8],
    role: &[u8],
    period: u64,
    level: u64,
    key_index: u32,
  ) -> Result<Transaction, Error> {
    self.invoke(gas_price, gas_limit, "delegate", &[
      contract.into(),
      from.into(),
      to.into(),
      role.into(),
      period.into(),
      level.into(),
      (key_index as u64).into(),
    ])
  }

  #[allow(clippy::too_many_arguments)]
  pub fn new_withdraw_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    contract: Address,
    initiator: &[u8],
    delegate: &[u8],
    role: &[u8],
    key_index: u32,
  ) -> Result<Transaction, Error> {
    self.invoke(gas_price, gas_limit, "withdraw", &[
      contract.into(),
      initiator.into(),
      delegate.into(),
      role.into(),
      (key_index as u64).into(),
    ])
  }

  #[allow(clippy::too_many_arguments)]
  pub fn new_assign_ids_to_role_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    contract: Address,
    admin_id: &[u8],
    role: &[u8],
    persons: &[&[u8]],
    key_index: u32,
  ) -> Result<Transaction, Error> {
    let persons = persons.iter().map(|p| CallArgument::from(*p)).collect();
    self.invoke(gas_price, gas_limit, "assignOntIDsToRole", &[
      contract.into(),
      admin_id.into(),
      role.into(),
      CallArgument::List(persons),
      (key_index as u64).into(),
    ])
  }

  /// Hands administration of `contract` over to another DID.
  pub fn new_transfer_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    contract: Address,
    new_admin_id: &[u8],
    key_index: u32,
  ) -> Result<Transaction, Error> {
    self.invoke(gas_price, gas_limit, "transfer", &[
      contract.into(),
      new_admin_id.into(),
      (key_index as u64).into(),
    ])
  }

  pub fn new_verify_token_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    contract: Address,
    caller: &[u8],
    function: &str,
    key_index: u32,
  ) -> Result<Transaction, Error> {
    self.invoke(gas_price, gas_limit, "verifyToken", &[
      contract.into(),
      caller.into(),
      function.into(),
      (key_index as u64).into(),
    ])
  }

  pub fn init_auth(
    &self,
    gas_price: u64,
    gas_limit: u64,
    signer: &Account,
  ) -> Result<SignedTransaction, Error> {
    seal(self.new_init_auth_transaction(gas_price, gas_limit)?, &[signer])
  }

  #[allow(clippy::too_many_arguments)]
  pub fn assign_funcs_to_role(
    &self,
    gas_price: u64,
    gas_limit: u64,
    signer: &Account,
    contract: Address,
    admin_id: &[u8],
    role: &[u8],
    functions: &[&str],
    key_index: u32,
  ) -> Result<SignedTransaction, Error> {
    let tx = self.new_assign_funcs_to_role_transaction(
      gas_price, gas_limit, contract, admin_id, role, functions, key_index,
    )?;
    seal(tx, &[signer])
  }

  #[allow(clippy::too_many_arguments)]
  pub fn delegate(
    &self,
    gas_price: u64,
    gas_limit: u64,
    signer: &Account,
    contract: Address,
    from: &[u8],
    to: &[u8],
    role: &[u8],
    period: u64,
    level: u64,
    key_index: u32,
  ) -> Result<SignedTransaction, Error> {
    let tx = self.new_delegate_transaction(
      gas_price, gas_limit, contract, from, to, role, period, level, key_index,
    )?;
    seal(tx, &[signer])
  }

  #[allow(clippy::too_many_arguments)]
  pub fn withdraw(
    &self,
    gas_price: u64,
    gas_limit: u64,
    signer: &Account,
    contract: Address,
    initiator: &[u8],
    delegate: &[u8],
    role: &[u8],
    key_index: u32,
  ) -> Result<SignedTransaction, Error> {
    let tx = self.new_withdraw_transaction(
      gas_price, gas_limit, contract, initiator, delegate, role, key_index,
    )?;
    seal(tx, &[signer])
  }

  #[allow(clippy::too_many_arguments)]
  pub fn assign_ids_to_role(
    &self,
    gas_price: u64,
    gas_limit: u64,
    signer: &Account,
    contract: Address,
    admin_id: &[u8],
    role: &[u8],
    persons: &[&[u8]],
    key_index: u32,
  ) -> Result<SignedTransaction, Error> {
    let tx = self.new_assign_ids_to_role_transaction(
      gas_price, gas_limit, contract, admin_id, role, persons, key_index,
    )?;
    seal(tx, &[signer])
  }

  pub fn transfer(
    &self,
    gas_price: u64,
    gas_limit: u64,
    signer: &Account,
    contract: Address,
    new_admin_id: &[u8],
    key_index: u32,
  ) -> Result<SignedTransaction, Error> {
    let tx = self.new_transfer_transaction(
      gas_price,
      gas_limit,
      contract,
      new_admin_id,
      key_index,
    )?;
    seal(tx, &[signer])
  }

  #[allow(clippy::too_many_arguments)]
  pub fn verify_token(
    &self,
    gas_price: u64,
    gas_limit: u64,
    signer: &Account,
    contract: Address,
    caller: &[u8],
    function: &str,
    key_index: u32,
  ) -> Result<SignedTransaction, Error> {
    let tx = self.new_verify_token_transaction(
      gas_price, gas_limit, contract, caller, function, key_index,
    )?;
    seal(tx, &[signer])
  }
}
