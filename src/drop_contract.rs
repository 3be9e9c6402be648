use {
  super::*,
  rpc::{Receipt, TransactionRequest},
};

/// Handle to one collection's on-chain drop contract.
#[derive(Debug, Clone)]
pub struct DropContract {
  address: Address,
  polling_interval: Duration,
  receipt_timeout: Duration,
  rpc: Arc<RpcClient>,
}

impl DropContract {
  pub fn new(address: Address, rpc: Arc<RpcClient>) -> Self {
    Self {
      address,
      polling_interval: Duration::from_secs(1),
      receipt_timeout: Duration::from_secs(300),
      rpc,
    }
  }

  pub fn polling_interval(self, polling_interval: Duration) -> Self {
    Self {
      polling_interval,
      ..self
    }
  }

  pub fn receipt_timeout(self, receipt_timeout: Duration) -> Self {
    Self {
      receipt_timeout,
      ..self
    }
  }

  pub fn address(&self) -> Address {
    self.address
  }

  pub async fn active_claim_condition(&self) -> Result<ClaimCondition> {
    let id = self
      .rpc
      .eth_call(self.address, &IDropERC721::getActiveClaimConditionIdCall {})
      .await
      .with_context(|| format!("drop {} has no active claim condition", self.address))?
      .conditionId;

    Ok(
      self
        .rpc
        .eth_call(
          self.address,
          &IDropERC721::getClaimConditionByIdCall { conditionId: id },
        )
        .await?
        .condition,
    )
  }

  pub async fn claim_price(&self) -> Result<Ether> {
    Ok(self.active_claim_condition().await?.price())
  }

  pub async fn supply(&self) -> Result<Supply> {
    let (next_to_claim, next_to_mint) = (
      IDropERC721::nextTokenIdToClaimCall {},
      IDropERC721::nextTokenIdToMintCall {},
    );

    let (claimed, total) = tokio::try_join!(
      self.rpc.eth_call(self.address, &next_to_claim),
      self.rpc.eth_call(self.address, &next_to_mint),
    )?;

    Ok(Supply {
      claimed: Self::token_count(claimed.tokenId)?,
      total: Self::token_count(total.tokenId)?,
    })
  }

  fn token_count(token_id: U256) -> Result<u64> {
    u64::try_from(token_id).map_err(|_| anyhow!("token id {token_id} does not fit in a u64"))
  }

  /// Build the transaction claiming `quantity` tokens to `receiver` under
  /// the active claim condition.
  pub async fn claim_transaction(
    &self,
    receiver: Address,
    quantity: u64,
  ) -> Result<TransactionRequest> {
    let condition = self.active_claim_condition().await?;

    ensure!(
      condition.is_native(),
      "drop {} is priced in ERC-20 token {}, which is not supported",
      self.address,
      condition.currency
    );

    let value = condition
      .price()
      .checked_mul(quantity)
      .ok_or_else(|| anyhow!("claim value overflows"))?;

    let call = IDropERC721::claimCall {
      receiver,
      quantity: U256::from(quantity),
      currency: condition.currency,
      pricePerToken: condition.pricePerToken,
      proofs: Vec::new(),
      proofMaxQuantityPerTransaction: U256::ZERO,
    };

    Ok(TransactionRequest::new(
      receiver,
      self.address,
      call.abi_encode(),
      value,
    ))
  }

  /// Submit a claim through the session's wallet and wait for it to be
  /// mined. A reverted claim is an error.
  pub async fn claim_to(
    &self,
    session: &Session,
    receiver: Address,
    quantity: u64,
  ) -> Result<Receipt> {
    let transaction = self.claim_transaction(receiver, quantity).await?;

    let hash = session.send_transaction(transaction).await?;

    log::info!("submitted claim {hash} to drop {}", self.address);

    let receipt = tokio::time::timeout(self.receipt_timeout, self.wait_for_receipt(hash))
      .await
      .with_context(|| {
        format!(
          "timed out after {} waiting for claim {hash}",
          humantime::format_duration(self.receipt_timeout)
        )
      })??;

    ensure!(receipt.succeeded(), "claim {hash} reverted");

    Ok(receipt)
  }

  async fn wait_for_receipt(&self, hash: TxHash) -> Result<Receipt> {
    loop {
      if let Some(receipt) = self.rpc.receipt(hash).await? {
        return Ok(receipt);
      }

      tokio::time::sleep(self.polling_interval).await;
    }
  }
}
