use {
  clap::{Parser, Subcommand},
  dna_sdk::{Address, Config, ContractRef},
};

/// DNA transaction inspector
///
/// Decodes native contract invocation scripts, serialized transactions
/// and DID documents, and builds signed gas transfers for testing.
#[derive(Debug, Parser)]
pub struct InspectOptions {
  /// Print results as JSON
  #[clap(long, global = true)]
  pub json: bool,

  /// Gas price of built transactions
  #[clap(long, global = true, value_name = "PRICE")]
  gas_price: Option<u64>,

  /// Gas limit of built transactions
  #[clap(long, global = true, value_name = "LIMIT")]
  gas_limit: Option<u64>,

  /// Hex address of the gas contract, if not the built-in one
  #[clap(long, global = true, value_name = "HEX")]
  gas_contract: Option<String>,

  /// Hex address of a redeployed DID contract
  #[clap(long, global = true, value_name = "HEX")]
  did_contract: Option<String>,

  #[clap(subcommand)]
  pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// Decode a gas contract call from a hex invocation script
  DecodePayload {
    #[clap(value_name = "HEX")]
    script: String,
  },

  /// Decode a hex serialized transaction and the call it carries
  DecodeTx {
    #[clap(value_name = "HEX")]
    transaction: String,
  },

  /// Decode a hex DID document returned by a getDDO query
  DecodeDdo {
    /// DID the document belongs to
    #[clap(long)]
    id: String,

    #[clap(value_name = "HEX")]
    document: String,
  },

  /// Build and sign a single gas transfer
  BuildTransfer {
    /// Hex Ed25519 secret key of the sender
    #[clap(long, short)]
    secret: String,

    /// Base58 address of the receiver
    #[clap(long, short)]
    to: Address,

    #[clap(long, short)]
    amount: u64,

    /// Fixed nonce instead of the current time
    #[clap(long)]
    nonce: Option<u32>,
  },

  /// Package hex NeoVM bytecode and sign its deployment
  BuildDeploy {
    /// Hex Ed25519 secret key of the deployer
    #[clap(long, short)]
    secret: String,

    #[clap(long, short, value_name = "HEX")]
    code: String,

    #[clap(long, default_value = "")]
    name: String,

    #[clap(long = "contract-version", default_value = "")]
    contract_version: String,

    #[clap(long, default_value = "")]
    author: String,

    #[clap(long, default_value = "")]
    email: String,

    #[clap(long, default_value = "")]
    description: String,

    #[clap(long)]
    nonce: Option<u32>,
  },
}

impl InspectOptions {
  pub fn config(&self) -> anyhow::Result<Config> {
    let mut config = Config::default();
    if let Some(price) = self.gas_price {
      config.gas_price = price;
    }
    if let Some(limit) = self.gas_limit {
      config.gas_limit = limit;
    }
    if let Some(hex) = &self.gas_contract {
      config.gas_contract = ContractRef::new(Address::from_hex(hex)?, 0);
    }
    if let Some(hex) = &self.did_contract {
      config.did_contract = ContractRef::new(Address::from_hex(hex)?, 0);
    }
    Ok(config)
  }
}
