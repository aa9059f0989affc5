use dna_primitives::Address;

/// Location of a native contract on chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractRef {
  pub address: Address,
  pub version: u8,
}

impl ContractRef {
  pub const fn new(address: Address, version: u8) -> Self {
    Self { address, version }
  }
}

/// Native contracts live at fixed addresses whose only non-zero byte is
/// the last one, printed first in the reversed hex form ("0200..00").
const fn native_address(id: u8) -> Address {
  let mut bytes = [0u8; Address::LEN];
  bytes[Address::LEN - 1] = id;
  Address::new(bytes)
}

pub const GAS_CONTRACT: ContractRef = ContractRef::new(native_address(0x02), 0);
pub const DID_CONTRACT: ContractRef = ContractRef::new(native_address(0x03), 0);
pub const GLOBAL_PARAMS_CONTRACT: ContractRef =
  ContractRef::new(native_address(0x04), 0);
pub const AUTH_CONTRACT: ContractRef =
  ContractRef::new(native_address(0x06), 0);

/// SDK wide configuration.
#[derive(Debug, Clone)]
pub struct Config {
  pub gas_contract: ContractRef,
  pub global_params_contract: ContractRef,

  /// The DID and auth contracts are deployable. A chain may run them at
  /// addresses other than the built-in ones.
  pub did_contract: ContractRef,
  pub auth_contract: ContractRef,

  /// Gas price used by callers that do not pick their own.
  pub gas_price: u64,

  /// Gas limit used by callers that do not pick their own.
  pub gas_limit: u64,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      gas_contract: GAS_CONTRACT,
      global_params_contract: GLOBAL_PARAMS_CONTRACT,
      did_contract: DID_CONTRACT,
      auth_contract: AUTH_CONTRACT,
      gas_price: 500,
      gas_limit: 20000,
    }
  }
}
