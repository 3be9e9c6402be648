use {
  drops::{
    keccak256, Address, Bytes, ClaimCondition, Ether,
    IDropERC721::{self, IDropERC721Calls},
    SolCall, SolInterface, TxHash, NATIVE_TOKEN, U256,
  },
  jsonrpc_core::{Error, ErrorCode, IoHandler},
  jsonrpc_http_server::{Server, ServerBuilder},
  serde::{Deserialize, Serialize},
  std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
  },
};

pub fn builder() -> Builder {
  Builder {
    accounts: Vec::new(),
    drops: BTreeMap::new(),
    reject_claims: false,
    reject_connection: false,
  }
}

pub struct Builder {
  accounts: Vec<Address>,
  drops: BTreeMap<Address, DropState>,
  reject_claims: bool,
  reject_connection: bool,
}

impl Builder {
  pub fn account(mut self, account: Address) -> Self {
    self.accounts.push(account);
    self
  }

  pub fn drop(mut self, contract: Address, price: Ether, claimed: u64, total: u64) -> Self {
    self.drops.insert(
      contract,
      DropState {
        claimed,
        currency: NATIVE_TOKEN,
        price,
        total,
      },
    );
    self
  }

  pub fn erc20_drop(mut self, contract: Address, currency: Address, price: Ether) -> Self {
    self.drops.insert(
      contract,
      DropState {
        claimed: 0,
        currency,
        price,
        total: 10,
      },
    );
    self
  }

  /// Answer `eth_sendTransaction` the way a wallet does when the user
  /// declines to sign.
  pub fn reject_claims(mut self) -> Self {
    self.reject_claims = true;
    self
  }

  pub fn reject_connection(mut self) -> Self {
    self.reject_connection = true;
    self
  }

  pub fn build(self) -> Handle {
    let state = Arc::new(Mutex::new(State {
      accounts: self.accounts,
      drops: self.drops,
      receipts: BTreeMap::new(),
      reject_claims: self.reject_claims,
      reject_connection: self.reject_connection,
      requests: Vec::new(),
      transactions: Vec::new(),
    }));

    let mut io = IoHandler::default();
    io.extend_with(
      Node {
        state: state.clone(),
      }
      .to_delegate(),
    );

    let server = ServerBuilder::new(io)
      .threads(1)
      .start_http(&"127.0.0.1:0".parse().unwrap())
      .unwrap();

    Handle {
      port: server.address().port(),
      server: Some(server),
      state,
    }
  }
}

#[derive(Clone, Copy, Debug)]
struct DropState {
  claimed: u64,
  currency: Address,
  price: Ether,
  total: u64,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Transaction {
  pub from: Address,
  pub to: Address,
  pub data: Bytes,
  pub value: U256,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CallRequest {
  to: Address,
  data: Bytes,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
  transaction_hash: TxHash,
  block_number: String,
  status: String,
}

struct State {
  accounts: Vec<Address>,
  drops: BTreeMap<Address, DropState>,
  receipts: BTreeMap<TxHash, Receipt>,
  reject_claims: bool,
  reject_connection: bool,
  requests: Vec<String>,
  transactions: Vec<Transaction>,
}

impl State {
  fn claim(&mut self, transaction: &Transaction) -> Result<bool, Error> {
    let claim = IDropERC721::claimCall::abi_decode(&transaction.data, true)
      .map_err(|err| Error::invalid_params(err.to_string()))?;

    let Some(drop) = self.drops.get_mut(&transaction.to) else {
      return Ok(false);
    };

    let quantity = u64::try_from(claim.quantity).unwrap_or(u64::MAX);

    let success = claim.currency == drop.currency
      && claim.pricePerToken == drop.price.wei()
      && Some(transaction.value) == claim.pricePerToken.checked_mul(claim.quantity)
      && drop
        .claimed
        .checked_add(quantity)
        .map_or(false, |claimed| claimed <= drop.total);

    if success {
      drop.claimed += quantity;
    }

    Ok(success)
  }
}

#[jsonrpc_derive::rpc(server)]
pub trait Api {
  #[rpc(name = "eth_chainId")]
  fn chain_id(&self) -> Result<String, Error>;

  #[rpc(name = "eth_accounts")]
  fn accounts(&self) -> Result<Vec<Address>, Error>;

  #[rpc(name = "eth_requestAccounts")]
  fn request_accounts(&self) -> Result<Vec<Address>, Error>;

  #[rpc(name = "eth_call")]
  fn call(&self, call: CallRequest, block: Option<String>) -> Result<Bytes, Error>;

  #[rpc(name = "eth_sendTransaction")]
  fn send_transaction(&self, transaction: Transaction) -> Result<TxHash, Error>;

  #[rpc(name = "eth_getTransactionReceipt")]
  fn get_transaction_receipt(&self, hash: TxHash) -> Result<Option<Receipt>, Error>;
}

struct Node {
  state: Arc<Mutex<State>>,
}

impl Node {
  fn state(&self) -> MutexGuard<State> {
    self.state.lock().unwrap()
  }
}

fn execution_reverted() -> Error {
  Error {
    code: ErrorCode::ServerError(3),
    message: "execution reverted".into(),
    data: None,
  }
}

impl Api for Node {
  fn chain_id(&self) -> Result<String, Error> {
    self.state().requests.push("eth_chainId".into());
    Ok("0x539".into())
  }

  fn accounts(&self) -> Result<Vec<Address>, Error> {
    let mut state = self.state();
    state.requests.push("eth_accounts".into());
    Ok(state.accounts.clone())
  }

  fn request_accounts(&self) -> Result<Vec<Address>, Error> {
    let mut state = self.state();
    state.requests.push("eth_requestAccounts".into());

    if state.reject_connection {
      return Err(Error {
        code: ErrorCode::ServerError(4001),
        message: "User rejected the request.".into(),
        data: None,
      });
    }

    Ok(state.accounts.clone())
  }

  fn call(&self, call: CallRequest, _block: Option<String>) -> Result<Bytes, Error> {
    let mut state = self.state();
    state.requests.push("eth_call".into());

    let drop = *state.drops.get(&call.to).ok_or_else(execution_reverted)?;

    let decoded =
      IDropERC721Calls::abi_decode(&call.data, true).map_err(|_| execution_reverted())?;

    let data = match decoded {
      IDropERC721Calls::getActiveClaimConditionId(_) => {
        IDropERC721::getActiveClaimConditionIdCall::abi_encode_returns(&(U256::ZERO,))
      }
      IDropERC721Calls::getClaimConditionById(IDropERC721::getClaimConditionByIdCall {
        conditionId,
      }) if conditionId.is_zero() => {
        IDropERC721::getClaimConditionByIdCall::abi_encode_returns(&(ClaimCondition {
          startTimestamp: U256::ZERO,
          maxClaimableSupply: U256::MAX,
          supplyClaimed: U256::from(drop.claimed),
          quantityLimitPerTransaction: U256::MAX,
          waitTimeInSecondsBetweenClaims: U256::MAX,
          merkleRoot: Default::default(),
          pricePerToken: drop.price.wei(),
          currency: drop.currency,
        },))
      }
      IDropERC721Calls::nextTokenIdToClaim(_) => {
        IDropERC721::nextTokenIdToClaimCall::abi_encode_returns(&(U256::from(drop.claimed),))
      }
      IDropERC721Calls::nextTokenIdToMint(_) => {
        IDropERC721::nextTokenIdToMintCall::abi_encode_returns(&(U256::from(drop.total),))
      }
      IDropERC721Calls::getClaimConditionById(_) | IDropERC721Calls::claim(_) => {
        return Err(execution_reverted())
      }
    };

    Ok(data.into())
  }

  fn send_transaction(&self, transaction: Transaction) -> Result<TxHash, Error> {
    let mut state = self.state();
    let state = &mut *state;
    state.requests.push("eth_sendTransaction".into());

    if state.reject_claims {
      return Err(Error {
        code: ErrorCode::ServerError(4001),
        message: "User denied transaction signature.".into(),
        data: None,
      });
    }

    let success = state.claim(&transaction)?;

    state.transactions.push(transaction);

    let hash = keccak256(U256::from(state.transactions.len()).to_be_bytes::<32>());

    state.receipts.insert(
      hash,
      Receipt {
        transaction_hash: hash,
        block_number: format!("{:#x}", state.transactions.len()),
        status: if success { "0x1" } else { "0x0" }.into(),
      },
    );

    Ok(hash)
  }

  fn get_transaction_receipt(&self, hash: TxHash) -> Result<Option<Receipt>, Error> {
    let mut state = self.state();
    state.requests.push("eth_getTransactionReceipt".into());
    Ok(state.receipts.get(&hash).cloned())
  }
}

pub struct Handle {
  port: u16,
  server: Option<Server>,
  state: Arc<Mutex<State>>,
}

impl Handle {
  pub fn url(&self) -> String {
    format!("http://127.0.0.1:{}", self.port)
  }

  pub fn claimed(&self, contract: Address) -> u64 {
    self.state.lock().unwrap().drops[&contract].claimed
  }

  pub fn transactions(&self) -> Vec<Transaction> {
    self.state.lock().unwrap().transactions.clone()
  }

  /// Methods called so far, in order.
  pub fn requests(&self) -> Vec<String> {
    self.state.lock().unwrap().requests.clone()
  }
}

impl Drop for Handle {
  fn drop(&mut self) {
    if let Some(server) = self.server.take() {
      // The server owns a runtime, which may not be dropped from within an
      // async context, so close it on a separate thread.
      std::thread::scope(|scope| {
        scope.spawn(|| server.close());
      });
    }
  }
}
