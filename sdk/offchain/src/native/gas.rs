use {
  super::{
    call::{TransferFromState, TransferState},
    seal,
    NativeContract,
  },
  crate::{Account, ContractRef, Error},
  dna_primitives::{Address, SignedTransaction, Transaction},
  dna_vm::{CallArgument, InvocationScript},
};

impl From<&TransferState> for CallArgument {
  fn from(state: &TransferState) -> Self {
    CallArgument::record([
      ("from", state.from.into()),
      ("to", state.to.into()),
      ("amount", state.amount.into()),
    ])
  }
}

impl From<&TransferFromState> for CallArgument {
  fn from(state: &TransferFromState) -> Self {
    CallArgument::record([
      ("sender", state.sender.into()),
      ("from", state.from.into()),
      ("to", state.to.into()),
      ("amount", state.amount.into()),
    ])
  }
}

/// The native gas token.
pub struct Gas<'a> {
  native: &'a NativeContract,
}

impl<'a> Gas<'a> {
  pub(super) fn new(native: &'a NativeContract) -> Self {
    Self { native }
  }

  fn contract(&self) -> ContractRef {
    self.native.config().gas_contract
  }

  pub fn new_transfer_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    from: Address,
    to: Address,
    amount: u64,
  ) -> Result<Transaction, Error> {
    self.new_multi_transfer_transaction(gas_price, gas_limit, &[
      TransferState { from, to, amount },
    ])
  }

  /// Several transfers executed atomically by one transaction.
  pub fn new_multi_transfer_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    states: &[TransferState],
  ) -> Result<Transaction, Error> {
    let states = states.iter().map(CallArgument::from).collect();
    self.native.invoke(
      self.contract(),
      gas_price,
      gas_limit,
      "transfer",
      &[CallArgument::List(states)],
    )
  }

  pub fn new_transfer_from_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    sender: Address,
    from: Address,
    to: Address,
    amount: u64,
  ) -> Result<Transaction, Error> {
    let state = TransferFromState {
      sender,
      from,
      to,
      amount,
    };
    self.native.invoke(
      self.contract(),
      gas_price,
      gas_limit,
      "transferFrom",
      &[(&state).into()],
    )
  }

  pub fn new_approve_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    from: Address,
    to: Address,
    amount: u64,
  ) -> Result<Transaction, Error> {
    let state = TransferState { from, to, amount };
    self.native.invoke(
      self.contract(),
      gas_price,
      gas_limit,
      "approve",
      &[(&state).into()],
    )
  }

  pub fn transfer(
    &self,
    gas_price: u64,
    gas_limit: u64,
    from: &Account,
    to: Address,
    amount: u64,
  ) -> Result<SignedTransaction, Error> {
    let tx = self.new_transfer_transaction(
      gas_price,
      gas_limit,
      from.address(),
      to,
      amount,
    )?;
    seal(tx, &[from])
  }

  pub fn multi_transfer(
    &self,
    gas_price: u64,
    gas_limit: u64,
    states: &[TransferState],
    signer: &Account,
  ) -> Result<SignedTransaction, Error> {
    let tx = self.new_multi_transfer_transaction(gas_price, gas_limit, states)?;
    seal(tx, &[signer])
  }

  pub fn transfer_from(
    &self,
    gas_price: u64,
    gas_limit: u64,
    sender: &Account,
    from: Address,
    to: Address,
    amount: u64,
  ) -> Result<SignedTransaction, Error> {
    let tx = self.new_transfer_from_transaction(
      gas_price,
      gas_limit,
      sender.address(),
      from,
      to,
      amount,
    )?;
    seal(tx, &[sender])
  }

  pub fn approve(
    &self,
    gas_price: u64,
    gas_limit: u64,
    from: &Account,
    to: Address,
    amount: u64,
  ) -> Result<SignedTransaction, Error> {
    let tx = self.new_approve_transaction(
      gas_price,
      gas_limit,
      from.address(),
      to,
      amount,
    )?;
    seal(tx, &[from])
  }

  pub fn allowance_invocation(
    &self,
    from: Address,
    to: Address,
  ) -> Result<InvocationScript, Error> {
    self.native.query_invocation(self.contract(), "allowance", &[
      CallArgument::record([("from", from.into()), ("to", to.into())]),
    ])
  }

  pub fn balance_of_invocation(
    &self,
    owner: Address,
  ) -> Result<InvocationScript, Error> {
    self
      .native
      .query_invocation(self.contract(), "balanceOf", &[owner.into()])
  }

  pub fn name_invocation(&self) -> Result<InvocationScript, Error> {
    self.native.query_invocation(self.contract(), "name", &[])
  }

  pub fn symbol_invocation(&self) -> Result<InvocationScript, Error> {
    self.native.query_invocation(self.contract(), "symbol", &[])
  }

  pub fn decimals_invocation(&self) -> Result<InvocationScript, Error> {
    self.native.query_invocation(self.contract(), "decimals", &[])
  }

  pub fn total_supply_invocation(&self) -> Result<InvocationScript, Error> {
    self.native.query_invocation(self.contract(), "totalSupply", &[])
  }
}
