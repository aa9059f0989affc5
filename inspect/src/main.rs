use {
  crate::settings::{Command, InspectOptions},
  clap::Parser,
  dna_primitives::{DeployCode, Transaction, TxType, VmType},
  dna_sdk::{
    decode_ddo,
    parse_payload,
    Account,
    DecodedCall,
    NativeContract,
    NeoVmContract,
  },
  serde::Serialize,
  std::fmt::Debug,
  tracing::{debug, subscriber::set_global_default, warn},
  tracing_subscriber::{EnvFilter, FmtSubscriber},
};

mod settings;

#[derive(Debug, Serialize)]
struct TransactionSummary {
  hash: String,
  tx_type: TxType,
  nonce: u32,
  gas_price: u64,
  gas_limit: u64,
  payer: String,
  signers: Vec<String>,
  call: Option<DecodedCall>,
}

impl From<Transaction> for TransactionSummary {
  fn from(tx: Transaction) -> Self {
    let call = tx.payload.code().and_then(|code| match parse_payload(code) {
      Ok(call) => Some(call),
      Err(e) => {
        warn!("payload is not a decodable gas call: {e}");
        None
      }
    });

    Self {
      hash: tx.hash().to_string(),
      tx_type: tx.tx_type(),
      nonce: tx.nonce,
      gas_price: tx.gas_price,
      gas_limit: tx.gas_limit,
      payer: tx.payer.to_string(),
      signers: tx
        .witnesses()
        .iter()
        .map(|w| w.public_key.to_hex())
        .collect(),
      call,
    }
  }
}

fn print(value: &(impl Serialize + Debug), json: bool) -> anyhow::Result<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(value)?);
  } else {
    println!("{value:#?}");
  }
  Ok(())
}

fn main() -> anyhow::Result<()> {
  // logs go to stderr, results to stdout
  set_global_default(
    FmtSubscriber::builder()
      .with_env_filter(EnvFilter::from_default_env())
      .with_writer(std::io::stderr)
      .finish(),
  )?;

  let opts = InspectOptions::parse();
  debug!("inspect options: {opts:?}");

  let native = NativeContract::new(opts.config()?);

  match &opts.command {
    Command::DecodePayload { script } => {
      let call = parse_payload(&hex::decode(script)?)?;
      print(&call, opts.json)
    }
    Command::DecodeTx { transaction } => {
      let tx = Transaction::deserialize(&hex::decode(transaction)?)?;
      print(&TransactionSummary::from(tx), opts.json)
    }
    Command::DecodeDdo { id, document } => {
      let ddo = decode_ddo(id, &hex::decode(document)?)?;
      print(&ddo, opts.json)
    }
    Command::BuildTransfer {
      secret,
      to,
      amount,
      nonce,
    } => {
      let sender = Account::from_secret(&hex::decode(secret)?)?;
      let config = native.config();

      let mut tx = native.gas().new_transfer_transaction(
        config.gas_price,
        config.gas_limit,
        sender.address(),
        *to,
        *amount,
      )?;
      if let Some(nonce) = nonce {
        tx = tx.with_nonce(*nonce);
      }
      tx.sign(&sender)?;

      let signed = tx.into_immutable();
      debug!("built transfer {}", signed.hash());
      println!("{}", signed.to_hex());
      Ok(())
    }
    Command::BuildDeploy {
      secret,
      code,
      name,
      contract_version,
      author,
      email,
      description,
      nonce,
    } => {
      let deployer = Account::from_secret(&hex::decode(secret)?)?;
      let config = native.config();

      let mut tx = NeoVmContract::new().new_deploy_code_transaction(
        config.gas_price,
        config.gas_limit,
        DeployCode {
          code: hex::decode(code)?,
          vm_type: VmType::NeoVm,
          name: name.clone(),
          version: contract_version.clone(),
          author: author.clone(),
          email: email.clone(),
          description: description.clone(),
        },
      );
      if let Some(nonce) = nonce {
        tx = tx.with_nonce(*nonce);
      }
      tx.sign(&deployer)?;

      let signed = tx.into_immutable();
      debug!("built deployment {}", signed.hash());
      println!("{}", signed.to_hex());
      Ok(())
    }
  }
}
