//! Calls into and deployment of NeoVM smart contracts.

use {
  crate::{native::seal, Account, Error},
  dna_primitives::{Address, DeployCode, SignedTransaction, Transaction, VmType},
  dna_vm::{build_neovm_invoke, CallArgument},
  tracing::debug,
};

/// Descriptive fields stored on chain with a deployed contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractMetadata {
  pub name: String,
  pub version: String,
  pub author: String,
  pub email: String,
  pub description: String,
}

/// Builds transactions for user contracts running on NeoVM.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeoVmContract;

impl NeoVmContract {
  pub fn new() -> Self {
    Self
  }

  /// Unsigned deployment of already packaged contract code.
  pub fn new_deploy_code_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    contract: DeployCode,
  ) -> Transaction {
    Transaction::new_deploy(gas_price, gas_limit, contract)
  }

  /// Packages NeoVM bytecode with its metadata and signs the deployment
  /// with `signer`, who also pays for it.
  pub fn deploy_smart_contract(
    &self,
    gas_price: u64,
    gas_limit: u64,
    signer: &Account,
    code: &[u8],
    metadata: &ContractMetadata,
  ) -> Result<SignedTransaction, Error> {
    let deploy = DeployCode {
      code: code.to_vec(),
      vm_type: VmType::NeoVm,
      name: metadata.name.clone(),
      version: metadata.version.clone(),
      author: metadata.author.clone(),
      email: metadata.email.clone(),
      description: metadata.description.clone(),
    };
    debug!(
      "deploying neovm contract {:?} ({} bytes of code)",
      metadata.name,
      code.len()
    );

    let tx = self.new_deploy_code_transaction(gas_price, gas_limit, deploy);
    seal(tx, &[signer])
  }

  pub fn new_invoke_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    contract: &Address,
    args: &[CallArgument],
  ) -> Result<Transaction, Error> {
    let script = build_neovm_invoke(contract, args)?;
    Ok(Transaction::new_invoke(gas_price, gas_limit, script))
  }

  pub fn invoke(
    &self,
    gas_price: u64,
    gas_limit: u64,
    signer: &Account,
    contract: &Address,
    args: &[CallArgument],
  ) -> Result<SignedTransaction, Error> {
    let tx = self.new_invoke_transaction(gas_price, gas_limit, contract, args)?;
    seal(tx, &[signer])
  }

  /// Unsigned zero-gas call, meant to be pre-executed by a node.
  pub fn new_pre_exec_transaction(
    &self,
    contract: &Address,
    args: &[CallArgument],
  ) -> Result<Transaction, Error> {
    self.new_invoke_transaction(0, 0, contract, args)
  }
}
