use {super::*, rpc::TransactionRequest, serde_json::json};

/// The connected wallet, passed explicitly to whatever needs the current
/// address. Clones share the same connection state.
#[derive(Clone, Debug)]
pub struct Session {
  address: Arc<watch::Sender<Option<Address>>>,
  wallet: Arc<RpcClient>,
}

impl Session {
  pub fn new(wallet: Arc<RpcClient>) -> Self {
    Self {
      address: Arc::new(watch::channel(None).0),
      wallet,
    }
  }

  /// Ask the wallet for account access. The first account it exposes becomes
  /// the current address.
  pub async fn connect(&self) -> Result<Address> {
    let accounts: Vec<Address> = self
      .wallet
      .call("eth_requestAccounts", json!([]))
      .await
      .context("wallet refused connection")?;

    let address = accounts
      .first()
      .copied()
      .ok_or_else(|| anyhow!("wallet exposed no accounts"))?;

    log::info!("connected wallet {address}");

    self.address.send_replace(Some(address));

    Ok(address)
  }

  pub fn disconnect(&self) {
    if let Some(address) = self.address.send_replace(None) {
      log::info!("disconnected wallet {address}");
    }
  }

  pub fn address(&self) -> Option<Address> {
    *self.address.borrow()
  }

  pub fn subscribe(&self) -> watch::Receiver<Option<Address>> {
    self.address.subscribe()
  }

  pub async fn send_transaction(&self, transaction: TransactionRequest) -> Result<TxHash> {
    ensure!(
      self.address() == Some(transaction.from),
      "wallet is not connected as {}",
      transaction.from
    );

    self
      .wallet
      .call("eth_sendTransaction", json!([transaction]))
      .await
  }
}
