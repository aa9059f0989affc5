use {
  dna_primitives::{opcode::StructuralOp, Payload, TxType},
  dna_sdk::{
    parse_from_transaction,
    parse_payload,
    Account,
    Address,
    CallArgument,
    ContractMetadata,
    Error,
    NeoVmContract,
    Transaction,
    VmType,
  },
  dna_vm::build_neovm_invoke,
};

fn contract() -> Address {
  Address::new([0x5c; 20])
}

fn args() -> Vec<CallArgument> {
  vec![
    "put".into(),
    CallArgument::List(vec![b"key".as_slice().into(), 42u64.into()]),
  ]
}

#[test]
fn invoke_calls_contract_by_address() -> anyhow::Result<()> {
  let neovm = NeoVmContract::new();
  let tx = neovm.new_invoke_transaction(500, 20000, &contract(), &args())?;

  let code = tx.payload.code().unwrap();
  assert_eq!(code, build_neovm_invoke(&contract(), &args())?.as_bytes());

  let (head, address) = code.split_at(code.len() - Address::LEN);
  assert_eq!(head.last(), Some(&StructuralOp::AppCall.byte()));
  assert_eq!(address, contract().as_ref());

  // not a native call
  assert!(parse_payload(code).is_err());
  Ok(())
}

#[test]
fn signed_invoke_is_paid_by_signer() -> anyhow::Result<()> {
  let signer = Account::generate();
  let signed =
    NeoVmContract::new().invoke(500, 20000, &signer, &contract(), &args())?;

  let tx = Transaction::deserialize(signed.as_bytes())?;
  assert_eq!(tx.tx_type(), TxType::Invoke);
  assert_eq!(tx.payer, signer.address());
  assert_eq!(tx.witnesses().len(), 1);
  assert_eq!(tx.hash(), signed.hash());
  Ok(())
}

#[test]
fn pre_exec_transaction_is_free_and_unsigned() -> anyhow::Result<()> {
  let tx =
    NeoVmContract::new().new_pre_exec_transaction(&contract(), &args())?;
  assert_eq!(tx.gas_price, 0);
  assert_eq!(tx.gas_limit, 0);
  assert!(tx.payer.is_empty());
  assert!(tx.witnesses().is_empty());
  Ok(())
}

#[test]
fn deployment_carries_code_and_metadata() -> anyhow::Result<()> {
  let signer = Account::generate();
  let code = hex::decode("00c56b516c766b00527ac46203000f6c766b00c3616c7566")?;
  let metadata = ContractMetadata {
    name: "counter".into(),
    version: "1.0".into(),
    author: "dev".into(),
    email: "dev@example.org".into(),
    description: "counts calls".into(),
  };

  let signed = NeoVmContract::new().deploy_smart_contract(
    500, 200_000, &signer, &code, &metadata,
  )?;
  let tx = Transaction::deserialize(signed.as_bytes())?;

  assert_eq!(tx.tx_type(), TxType::Deploy);
  assert_eq!(tx.payer, signer.address());
  let Payload::Deploy(deploy) = &tx.payload else {
    panic!("expected a deploy payload");
  };
  assert_eq!(deploy.code, code);
  assert_eq!(deploy.vm_type, VmType::NeoVm);
  assert_eq!(deploy.name, "counter");
  assert_eq!(deploy.email, "dev@example.org");
  assert_eq!(deploy.description, "counts calls");

  assert!(matches!(
    parse_from_transaction(signed.as_bytes()),
    Err(Error::NotInvokeTransaction)
  ));
  Ok(())
}
