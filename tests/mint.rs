use {super::*, pretty_assertions::assert_eq, subcommand::mint::Output};

#[test]
fn mint() {
  let sanity = sanity();
  let node = node(13);

  let output = CommandBuilder::new("mint mira-cruise")
    .sanity(&sanity)
    .node(&node)
    .expected_stderr("Mint NFT (0.01 ETH)\nMinting…\nHOORAY… You successfully minted!\n")
    .run_and_deserialize_output::<Output>();

  assert_eq!(output.collection, "mira-cruise");
  assert_eq!(output.contract, CONTRACT.parse::<Address>().unwrap());
  assert_eq!(output.receiver, ACCOUNT.parse::<Address>().unwrap());

  let contract = CONTRACT.parse::<Address>().unwrap();
  assert_eq!(node.claimed(contract), 14);

  let transactions = node.transactions();
  assert_eq!(transactions.len(), 1);
  assert_eq!(transactions[0].value, U256::from(10_000_000_000_000_000u64));
}

#[test]
fn sold_out() {
  let sanity = sanity();
  let node = node(21);

  CommandBuilder::new("mint mira-cruise")
    .sanity(&sanity)
    .node(&node)
    .expected_exit_code(1)
    .expected_stderr("error: cannot mint from `mira-cruise`: Sold OUT!\n")
    .run_and_check_output();

  assert!(node.transactions().is_empty());
}

#[test]
fn rejected_claim() {
  let sanity = sanity();
  let node = test_evm_rpc::builder()
    .account(ACCOUNT.parse().unwrap())
    .drop(CONTRACT.parse().unwrap(), "0.01".parse().unwrap(), 13, 21)
    .reject_claims()
    .build();

  CommandBuilder::new("mint mira-cruise")
    .sanity(&sanity)
    .node(&node)
    .expected_exit_code(1)
    .stderr_regex(
      r"Mint NFT \(0.01 ETH\)
.*Whoops… Something went wrong!
.*error: failed to mint from `mira-cruise`
",
    )
    .run_and_check_output();

  assert_eq!(node.claimed(CONTRACT.parse().unwrap()), 13);
}

#[test]
fn wallet_refuses_connection() {
  let sanity = sanity();
  let node = test_evm_rpc::builder()
    .account(ACCOUNT.parse().unwrap())
    .reject_connection()
    .build();

  CommandBuilder::new("mint mira-cruise")
    .sanity(&sanity)
    .node(&node)
    .expected_exit_code(1)
    .stderr_regex("error: wallet refused connection\nbecause: .*\n")
    .run_and_check_output();
}

#[test]
fn wallet_without_accounts() {
  let sanity = sanity();
  let node = test_evm_rpc::builder().build();

  CommandBuilder::new("mint mira-cruise")
    .sanity(&sanity)
    .node(&node)
    .expected_exit_code(1)
    .expected_stderr("error: wallet exposed no accounts\n")
    .run_and_check_output();
}
