use {
  dna_primitives::{
    opcode::{is_push, StructuralOp},
    Address,
    DeployCode,
    Transaction,
    VmType,
  },
  dna_sdk::{
    parse_from_transaction,
    parse_payload,
    Account,
    CallArgument,
    CallArguments,
    Config,
    ContractRef,
    Error,
    NativeContract,
    TransferFromState,
    TransferState,
  },
  dna_vm::{build_native_invoke, scan},
  rand::Rng,
};

const HOLDER: &str = "d2c124dd088190f709b684e0bc676d70c41b3776";
const OTHER: &str = "9018fbdfe16d5b1054165ab892b0e040919bd1ca";
const THIRD: &str = "3e7c40c2a2a98e3f95adace19b12ef4a1d7a3506";
const TAIL: &str = "1400000000000000000000000000000000000000010068\
                    164f6e746f6c6f67792e4e61746976652e496e766f6b65";

fn addr(hex: &str) -> Address {
  Address::from_slice(&hex::decode(hex).unwrap()).unwrap()
}

fn test_contract() -> Address {
  Address::from_hex("0100000000000000000000000000000000000000").unwrap()
}

/// Native contracts pointed at the contract used by the recorded scripts.
fn native() -> NativeContract {
  let contract = ContractRef::new(test_contract(), 0);
  NativeContract::new(Config {
    gas_contract: contract,
    ..Config::default()
  })
}

fn random_address(rng: &mut impl Rng) -> Address {
  Address::new(rng.gen())
}

#[test]
fn recorded_single_transfer() -> anyhow::Result<()> {
  let script = hex::decode(format!(
    "00c66b6a14{HOLDER}c86a14{HOLDER}c86a0164c86c51c1087472616e73666572{TAIL}"
  ))?;

  let call = parse_payload(&script)?;
  assert_eq!(call.method, "transfer");
  assert_eq!(call.contract, test_contract());
  assert_eq!(call.version, 0);
  assert_eq!(
    call.arguments,
    CallArguments::Transfer(vec![TransferState {
      from: addr(HOLDER),
      to: addr(HOLDER),
      amount: 100,
    }])
  );
  Ok(())
}

#[test]
fn recorded_batch_transfer() -> anyhow::Result<()> {
  let state = format!("00c66b6a14{HOLDER}c86a14{HOLDER}c86a0164c86c");
  let script = hex::decode(format!(
    "{}0114c1087472616e73666572{TAIL}",
    state.repeat(20)
  ))?;

  let CallArguments::Transfer(states) = parse_payload(&script)?.arguments
  else {
    panic!("expected a transfer");
  };
  assert_eq!(states.len(), 20);
  assert!(states.iter().all(|s| s.amount == 100 && s.from == addr(HOLDER)));
  Ok(())
}

#[test]
fn recorded_transfer_from() -> anyhow::Result<()> {
  let script = hex::decode(format!(
    "00c66b6a14{HOLDER}c86a14{HOLDER}c86a14{HOLDER}c86a0114c86c\
     0c7472616e7366657246726f6d{TAIL}"
  ))?;

  assert_eq!(
    parse_payload(&script)?.arguments,
    CallArguments::TransferFrom(TransferFromState {
      sender: addr(HOLDER),
      from: addr(HOLDER),
      to: addr(HOLDER),
      amount: 20,
    })
  );
  Ok(())
}

#[test]
fn recorded_gas_transfer() -> anyhow::Result<()> {
  let from = "21ab6ece5c9e44fa5e35261ef42cc6bc31d98e9c";
  let to = "c1d2d106f9d2276b383958973b9fca8e4f48cc96";
  let script = hex::decode(format!(
    "00c66b14{from}6a7cc814{to}6a7cc80400e1f5056a7cc86c51c1\
     087472616e73666572\
     1400000000000000000000000000000000000000020068\
     164f6e746f6c6f67792e4e61746976652e496e766f6b65"
  ))?;

  let call = parse_payload(&script)?;
  assert_eq!(call.contract, Config::default().gas_contract.address);
  assert_eq!(
    call.arguments,
    CallArguments::Transfer(vec![TransferState {
      from: addr(from),
      to: addr(to),
      amount: 100_000_000,
    }])
  );
  Ok(())
}

#[test]
fn recorded_swap_style_scripts() -> anyhow::Result<()> {
  let fields = format!("14{HOLDER}6a7cc814{OTHER}6a7cc814{THIRD}6a7cc8");
  for (amount_push, amount) in
    [("0164", 100u64), ("0400ca9a3b", 1_000_000_000)]
  {
    let script = hex::decode(format!(
      "00c66b{fields}{amount_push}6a7cc86c\
       0c7472616e7366657246726f6d{TAIL}"
    ))?;
    assert_eq!(
      parse_payload(&script)?.arguments,
      CallArguments::TransferFrom(TransferFromState {
        sender: addr(HOLDER),
        from: addr(OTHER),
        to: addr(THIRD),
        amount,
      })
    );
  }

  let pair = format!("14{HOLDER}6a7cc814{HOLDER}6a7cc8");
  for (amount_push, amount) in
    [("01646a7cc8", 100u64), ("5a6a7cc8", 10), ("0400ca9a3b6a7cc8", 1_000_000_000)]
  {
    let script = hex::decode(format!(
      "00c66b{pair}{amount_push}6c51c1087472616e73666572{TAIL}"
    ))?;
    assert_eq!(
      parse_payload(&script)?.arguments,
      CallArguments::Transfer(vec![TransferState {
        from: addr(HOLDER),
        to: addr(HOLDER),
        amount,
      }])
    );
  }
  Ok(())
}

#[test]
fn boundary_amounts_roundtrip() -> anyhow::Result<()> {
  let native = native();
  let gas = native.gas();
  let mut rng = rand::thread_rng();

  for amount in [0, 1, 16, 17, 127, 128, 255, 256, u64::MAX - 1, u64::MAX] {
    let (a, b, c) = (
      random_address(&mut rng),
      random_address(&mut rng),
      random_address(&mut rng),
    );

    let tx = gas.new_transfer_transaction(500, 20000, a, b, amount)?;
    assert_eq!(
      parse_payload(tx.payload.code().unwrap())?.arguments,
      CallArguments::Transfer(vec![TransferState {
        from: a,
        to: b,
        amount
      }])
    );

    let tx = gas.new_transfer_from_transaction(500, 20000, a, b, c, amount)?;
    assert_eq!(
      parse_payload(tx.payload.code().unwrap())?.arguments,
      CallArguments::TransferFrom(TransferFromState {
        sender: a,
        from: b,
        to: c,
        amount
      })
    );

    let tx = gas.new_approve_transaction(500, 20000, a, b, amount)?;
    assert_eq!(
      parse_payload(tx.payload.code().unwrap())?.arguments,
      CallArguments::Approve(TransferState {
        from: a,
        to: b,
        amount
      })
    );
  }
  Ok(())
}

#[test]
fn batches_roundtrip_in_call_order() -> anyhow::Result<()> {
  let native = native();
  let mut rng = rand::thread_rng();

  for size in 1..=50 {
    let states: Vec<_> = (0..size)
      .map(|_| TransferState {
        from: random_address(&mut rng),
        to: random_address(&mut rng),
        amount: rng.gen(),
      })
      .collect();

    let tx = native
      .gas()
      .new_multi_transfer_transaction(500, 20000, &states)?;
    let call = parse_payload(tx.payload.code().unwrap())?;
    assert_eq!(call.arguments, CallArguments::Transfer(states));
  }
  Ok(())
}

#[test]
fn query_scripts_roundtrip() -> anyhow::Result<()> {
  let native = native();
  let (a, b) = (addr(HOLDER), addr(OTHER));

  let script = native.gas().allowance_invocation(a, b)?;
  assert_eq!(
    parse_payload(&script)?.arguments,
    CallArguments::Allowance { from: a, to: b }
  );

  let script = native.gas().balance_of_invocation(a)?;
  assert_eq!(
    parse_payload(&script)?.arguments,
    CallArguments::BalanceOf { owner: a }
  );
  Ok(())
}

#[test]
fn decoding_is_repeatable() -> anyhow::Result<()> {
  let states = vec![
    TransferState {
      from: addr(HOLDER),
      to: addr(OTHER),
      amount: 7,
    },
    TransferState {
      from: addr(OTHER),
      to: addr(THIRD),
      amount: 9,
    },
  ];
  let tx = native()
    .gas()
    .new_multi_transfer_transaction(0, 0, &states)?;
  let script = tx.payload.code().unwrap();

  assert_eq!(parse_payload(script)?, parse_payload(script)?);
  Ok(())
}

#[test]
fn partial_transfer_group_is_malformed() -> anyhow::Result<()> {
  let script = build_native_invoke(&test_contract(), 0, "transfer", &[
    CallArgument::List(vec![CallArgument::record([
      ("from", addr(HOLDER).into()),
      ("to", addr(OTHER).into()),
      ("amount", 5u64.into()),
      ("memo", "extra".into()),
    ])]),
  ])?;

  assert!(matches!(
    parse_payload(&script),
    Err(Error::MalformedCallArguments { method, .. }) if method == "transfer"
  ));
  Ok(())
}

#[test]
fn non_address_operand_is_malformed() -> anyhow::Result<()> {
  let script = build_native_invoke(&test_contract(), 0, "balanceOf", &[
    "not an address".into(),
  ])?;
  assert!(matches!(
    parse_payload(&script),
    Err(Error::MalformedCallArguments { .. })
  ));
  Ok(())
}

#[test]
fn unknown_method_is_unsupported() -> anyhow::Result<()> {
  let script = build_native_invoke(&test_contract(), 0, "mint", &[
    addr(HOLDER).into(),
  ])?;
  assert!(matches!(
    parse_payload(&script),
    Err(Error::UnsupportedMethod(method)) if method == "mint"
  ));
  Ok(())
}

#[test]
fn auth_handover_is_not_a_token_transfer() -> anyhow::Result<()> {
  // three operands, the first two address sized, like a gas transfer
  let tx = NativeContract::default().auth().new_transfer_transaction(
    0,
    20000,
    addr(HOLDER),
    &[0x61; 20],
    1,
  )?;

  assert!(matches!(
    parse_payload(tx.payload.code().unwrap()),
    Err(Error::UnsupportedMethod(method)) if method.starts_with("transfer on")
  ));
  Ok(())
}

#[test]
fn foreign_opcodes_are_rejected_anywhere() -> anyhow::Result<()> {
  let tx = native().gas().new_transfer_transaction(
    0,
    0,
    addr(HOLDER),
    addr(OTHER),
    1_000,
  )?;
  let script = tx.payload.code().unwrap().to_vec();

  let mut boundaries: Vec<_> =
    scan(&script)?.iter().map(|i| i.offset()).collect();
  boundaries.push(script.len());

  let foreign = (0..=u8::MAX)
    .filter(|b| !is_push(*b) && StructuralOp::from_byte(*b).is_none());

  for opcode in foreign {
    for &offset in &boundaries {
      let mut tampered = script.clone();
      tampered.insert(offset, opcode);
      assert!(
        matches!(
          parse_payload(&tampered),
          Err(Error::Script(dna_vm::Error::UnrecognizedOpcode {
            offset: o,
            opcode: op,
          })) if o == offset && op == opcode
        ),
        "opcode {opcode:#04x} at {offset} was accepted"
      );
    }
  }
  Ok(())
}

#[test]
fn single_transfer_end_to_end() -> anyhow::Result<()> {
  let native = NativeContract::default();
  let sender = Account::generate();
  let receiver = Account::generate();

  let signed =
    native
      .gas()
      .transfer(500, 20000, &sender, receiver.address(), 100)?;
  let call = parse_from_transaction(signed.as_bytes())?;

  assert_eq!(call.method, "transfer");
  assert_eq!(call.contract, Config::default().gas_contract.address);
  assert_eq!(
    call.arguments,
    CallArguments::Transfer(vec![TransferState {
      from: sender.address(),
      to: receiver.address(),
      amount: 100,
    }])
  );
  Ok(())
}

#[test]
fn twenty_transfers_end_to_end() -> anyhow::Result<()> {
  let native = NativeContract::default();
  let sender = Account::generate();
  let receiver = Account::generate();
  let amount: u64 = rand::thread_rng().gen();

  let states = vec![
    TransferState {
      from: sender.address(),
      to: receiver.address(),
      amount,
    };
    20
  ];
  let signed = native
    .gas()
    .multi_transfer(500, 20000, &states, &sender)?;

  let CallArguments::Transfer(decoded) =
    parse_from_transaction(signed.as_bytes())?.arguments
  else {
    panic!("expected a transfer");
  };
  assert_eq!(decoded.len(), 20);
  assert!(decoded.iter().all(|s| s.amount == amount));
  Ok(())
}

#[test]
fn deploy_transaction_carries_no_call() -> anyhow::Result<()> {
  let tx = Transaction::new_deploy(0, 0, DeployCode {
    code: vec![0x00, 0x66],
    vm_type: VmType::NeoVm,
    name: "name".into(),
    version: "1.0".into(),
    author: "author".into(),
    email: "author@example.org".into(),
    description: "".into(),
  });

  assert!(matches!(
    parse_from_transaction(&tx.to_bytes()),
    Err(Error::NotInvokeTransaction)
  ));
  Ok(())
}
