use {
  super::{seal, NativeContract},
  crate::{Account, ContractRef, Error},
  dna_primitives::{codec::Source, Address, SignedTransaction, Transaction},
  dna_vm::{CallArgument, InvocationScript},
  std::collections::BTreeMap,
};

/// Chain-wide key/value settings owned by an administrator.
pub struct GlobalParams<'a> {
  native: &'a NativeContract,
}

impl<'a> GlobalParams<'a> {
  pub(super) fn new(native: &'a NativeContract) -> Self {
    Self { native }
  }

  fn contract(&self) -> ContractRef {
    self.native.config().global_params_contract
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

  /// Parameters are sent in key order, so the same settings always
  /// produce the same script.
  pub fn new_set_global_params_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    params: &BTreeMap<String, String>,
  ) -> Result<Transaction, Error> {
    let params = params
      .iter()
      .map(|(key, value)| {
        CallArgument::record([
          ("key", key.as_str().into()),
          ("value", value.as_str().into()),
        ])
      })
      .collect();
    self.invoke(gas_price, gas_limit, "setGlobalParam", &[
      CallArgument::List(params),
    ])
  }

  pub fn new_transfer_admin_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    new_admin: Address,
  ) -> Result<Transaction, Error> {
    self.invoke(gas_price, gas_limit, "transferAdmin", &[new_admin.into()])
  }

  pub fn new_accept_admin_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    admin: Address,
  ) -> Result<Transaction, Error> {
    self.invoke(gas_price, gas_limit, "acceptAdmin", &[admin.into()])
  }

  pub fn new_set_operator_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
    operator: Address,
  ) -> Result<Transaction, Error> {
    self.invoke(gas_price, gas_limit, "setOperator", &[operator.into()])
  }

  pub fn new_create_snapshot_transaction(
    &self,
    gas_price: u64,
    gas_limit: u64,
  ) -> Result<Transaction, Error> {
    self.invoke(gas_price, gas_limit, "createSnapshot", &[])
  }

  pub fn set_global_params(
    &self,
    gas_price: u64,
    gas_limit: u64,
    signer: &Account,
    params: &BTreeMap<String, String>,
  ) -> Result<SignedTransaction, Error> {
    let tx =
      self.new_set_global_params_transaction(gas_price, gas_limit, params)?;
    seal(tx, &[signer])
  }

  pub fn transfer_admin(
    &self,
    gas_price: u64,
    gas_limit: u64,
    signer: &Account,
    new_admin: Address,
  ) -> Result<SignedTransaction, Error> {
    let tx =
      self.new_transfer_admin_transaction(gas_price, gas_limit, new_admin)?;
    seal(tx, &[signer])
  }

  /// Accepts a pending admin transfer on behalf of `signer`.
  pub fn accept_admin(
    &self,
    gas_price: u64,
    gas_limit: u64,
    signer: &Account,
  ) -> Result<SignedTransaction, Error> {
    let tx = self.new_accept_admin_transaction(
      gas_price,
      gas_limit,
      signer.address(),
    )?;
    seal(tx, &[signer])
  }

  pub fn set_operator(
    &self,
    gas_price: u64,
    gas_limit: u64,
    signer: &Account,
    operator: Address,
  ) -> Result<SignedTransaction, Error> {
    let tx =
      self.new_set_operator_transaction(gas_price, gas_limit, operator)?;
    seal(tx, &[signer])
  }

  pub fn create_snapshot(
    &self,
    gas_price: u64,
    gas_limit: u64,
    signer: &Account,
  ) -> Result<SignedTransaction, Error> {
    let tx = self.new_create_snapshot_transaction(gas_price, gas_limit)?;
    seal(tx, &[signer])
  }

  pub fn get_global_param_invocation(
    &self,
    names: &[&str],
  ) -> Result<InvocationScript, Error> {
    let names = names.iter().map(|n| CallArgument::from(*n)).collect();
    self.native.query_invocation(self.contract(), "getGlobalParam", &[
      CallArgument::List(names),
    ])
  }
}

/// Decodes the result of a `getGlobalParam` query: a var-uint count
/// followed by that many key and value strings.
pub fn decode_global_params(
  data: &[u8],
) -> Result<BTreeMap<String, String>, Error> {
  let truncated = |source| Error::TruncatedInput {
    section: "global params",
    source,
  };

  let mut source = Source::new(data);
  let count = source.read_var_uint().map_err(truncated)?;

  let mut params = BTreeMap::new();
  for _ in 0..count {
    let key = source.read_var_string().map_err(truncated)?;
    let value = source.read_var_string().map_err(truncated)?;
    params.insert(key, value);
  }
  Ok(params)
}

#[cfg(test)]
mod tests {
  use {
    super::decode_global_params,
    crate::Error,
    dna_primitives::codec::Sink,
  };

  #[test]
  fn decodes_param_list() {
    let mut sink = Sink::new();
    sink
      .write_var_uint(2)
      .write_var_str("gasPrice")
      .write_var_str("500")
      .write_var_str("admin")
      .write_var_str("AXYZ");

    let params = decode_global_params(sink.as_bytes()).unwrap();
    assert_eq!(params.len(), 2);
    assert_eq!(params["gasPrice"], "500");
    assert_eq!(params["admin"], "AXYZ");
  }

  #[test]
  fn count_past_end_is_truncated() {
    let mut sink = Sink::new();
    sink.write_var_uint(3).write_var_str("k").write_var_str("v");
    assert!(matches!(
      decode_global_params(sink.as_bytes()),
      Err(Error::TruncatedInput {
        section: "global params",
        ..
      })
    ));
  }
}
