mod auth;
pub mod call;
mod gas;
mod global_params;

use {
  crate::{did::Did, Config, ContractRef, Error},
  dna_primitives::{Address, SignedTransaction, Signer, Transaction},
  dna_vm::{build_native_invoke, CallArgument, InvocationScript},
  tracing::debug,
};

pub use {
  auth::Auth,
  gas::Gas,
  global_params::{decode_global_params, GlobalParams},
};

/// Builds transactions and query scripts for the chain's native
/// contracts.
///
/// Constructors return unsigned [`Transaction`]s that callers may sign
/// with any [`Signer`]. The convenience methods on the per-contract
/// views sign with the identities the contract expects, in the order
/// it checks them, and return a sealed transaction.
#[derive(Debug, Clone, Default)]
pub struct NativeContract {
  config: Config,
}

impl NativeContract {
  pub fn new(config: Config) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Points DID operations at a redeployed DID contract.
  pub fn set_did_contract(&mut self, address: Address, version: u8) {
    self.config.did_contract = ContractRef::new(address, version);
  }

  /// Points auth operations at a redeployed auth contract.
  pub fn set_auth_contract(&mut self, address: Address, version: u8) {
    self.config.auth_contract = ContractRef::new(address, version);
  }

  pub fn new_native_invoke_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    version: u8,
    contract: &Address,
    method: &str,
    args: &[CallArgument],
  ) -> Result<Transaction, Error> {
    let script = build_native_invoke(contract, version, method, args)?;
    let tx = Transaction::new_invoke(gas_price, gas_limit, script);
    debug!("new {method} transaction with nonce {}", tx.nonce);
    Ok(tx)
  }

  /// Script for a read-only call, meant to be pre-executed by a node.
  pub fn query_invocation(
    &self,
    contract: ContractRef,
    method: &str,
    args: &[CallArgument],
  ) -> Result<InvocationScript, Error> {
    Ok(build_native_invoke(
      &contract.address,
      contract.version,
      method,
      args,
    )?)
  }

  pub(crate) fn invoke(
    &self,
    contract: ContractRef,
    gas_price: u64,
    gas_limit: u64,
    method: &str,
    args: &[CallArgument],
  ) -> Result<Transaction, Error> {
    self.new_native_invoke_transaction(
      gas_price,
      gas_limit,
      contract.version,
      &contract.address,
      method,
      args,
    )
  }

  pub fn gas(&self) -> Gas<'_> {
    Gas::new(self)
  }

  pub fn did(&self) -> Did<'_> {
    Did::new(self)
  }

  pub fn auth(&self) -> Auth<'_> {
    Auth::new(self)
  }

  pub fn global_params(&self) -> GlobalParams<'_> {
    GlobalParams::new(self)
  }
}

impl From<Config> for NativeContract {
  fn from(config: Config) -> Self {
    Self::new(config)
  }
}

/// Applies `signers` in order and freezes the transaction.
pub(crate) fn seal(
  mut tx: Transaction,
  signers: &[&dyn Signer],
) -> Result<SignedTransaction, Error> {
  for signer in signers {
    tx.sign(signer)?;
  }
  Ok(tx.into_immutable())
}
