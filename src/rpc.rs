use {
  super::*,
  reqwest::Url,
  serde_json::{json, Value},
  std::sync::atomic::AtomicU64,
};

#[derive(Deserialize)]
struct Response<T> {
  result: Option<T>,
  error: Option<RpcError>,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct RpcError {
  pub code: i64,
  pub message: String,
}

impl Display for RpcError {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "JSON-RPC error {}: {}", self.code, self.message)
  }
}

impl std::error::Error for RpcError {}

/// A transaction for the wallet to sign and submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
  pub from: Address,
  pub to: Address,
  pub data: Bytes,
  pub value: U256,
}

impl TransactionRequest {
  pub fn new(from: Address, to: Address, data: Vec<u8>, value: Ether) -> Self {
    Self {
      from,
      to,
      data: data.into(),
      value: value.wei(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
  pub transaction_hash: TxHash,
  pub status: Option<String>,
}

impl Receipt {
  pub fn succeeded(&self) -> bool {
    self.status.as_deref() == Some("0x1")
  }
}

/// Minimal JSON-RPC 2.0 client over HTTP.
#[derive(Debug)]
pub struct RpcClient {
  client: reqwest::Client,
  id: AtomicU64,
  url: Url,
}

impl RpcClient {
  pub fn new(url: &str) -> Result<Self> {
    Ok(Self {
      client: reqwest::Client::new(),
      id: AtomicU64::new(0),
      url: url
        .parse()
        .with_context(|| format!("invalid JSON-RPC URL `{url}`"))?,
    })
  }

  pub fn url(&self) -> &Url {
    &self.url
  }

  /// Call `method`, failing if the response carries an error. A `null`
  /// result deserializes as `T` if `T` admits it.
  pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
    let id = self.id.fetch_add(1, atomic::Ordering::Relaxed);

    log::trace!("{method} {params}");

    let response = self
      .client
      .post(self.url.clone())
      .json(&json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
      }))
      .send()
      .await
      .with_context(|| format!("failed to send `{method}` to {}", self.url))?
      .error_for_status()
      .with_context(|| format!("`{method}` request failed"))?
      .json::<Response<Value>>()
      .await
      .with_context(|| format!("failed to decode `{method}` response"))?;

    if let Some(error) = response.error {
      return Err(Error::new(error).context(format!("`{method}` failed")));
    }

    serde_json::from_value(response.result.unwrap_or(Value::Null))
      .with_context(|| format!("unexpected `{method}` result"))
  }

  /// Execute a read-only contract call against the latest block.
  pub async fn eth_call<C: SolCall>(&self, to: Address, call: &C) -> Result<C::Return> {
    let data: Bytes = self
      .call(
        "eth_call",
        json!([
          {
            "to": to,
            "data": Bytes::from(call.abi_encode()),
          },
          "latest"
        ]),
      )
      .await?;

    C::abi_decode_returns(&data, true)
      .with_context(|| format!("malformed return data from `{}`", C::SIGNATURE))
  }

  pub async fn receipt(&self, hash: TxHash) -> Result<Option<Receipt>> {
    self.call("eth_getTransactionReceipt", json!([hash])).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const CONTRACT: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

  #[tokio::test]
  async fn eth_call_decodes_returns() {
    let contract = CONTRACT.parse::<Address>().unwrap();

    let node = test_evm_rpc::builder()
      .drop(contract, "0.01".parse().unwrap(), 13, 21)
      .build();

    let rpc = RpcClient::new(&node.url()).unwrap();

    let next = rpc
      .eth_call(contract, &IDropERC721::nextTokenIdToMintCall {})
      .await
      .unwrap();

    assert_eq!(next.tokenId, U256::from(21));
  }

  #[tokio::test]
  async fn errors_carry_method_and_message() {
    let node = test_evm_rpc::builder().build();

    let rpc = RpcClient::new(&node.url()).unwrap();

    let err = rpc
      .eth_call(
        CONTRACT.parse().unwrap(),
        &IDropERC721::nextTokenIdToMintCall {},
      )
      .await
      .unwrap_err();

    assert_eq!(err.to_string(), "`eth_call` failed");
    assert_eq!(
      err.root_cause().to_string(),
      "JSON-RPC error 3: execution reverted"
    );
  }

  #[tokio::test]
  async fn missing_receipt_is_none() {
    let node = test_evm_rpc::builder().build();

    let rpc = RpcClient::new(&node.url()).unwrap();

    assert_eq!(rpc.receipt(TxHash::repeat_byte(1)).await.unwrap(), None);
  }

  #[test]
  fn transaction_request_hex_encodes_value() {
    let request = TransactionRequest::new(
      Address::ZERO,
      drops::NATIVE_TOKEN,
      vec![0xde, 0xad],
      "0.01".parse().unwrap(),
    );

    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(json["data"], "0xdead");
    assert_eq!(json["value"], "0x2386f26fc10000");
  }

  #[test]
  fn invalid_url() {
    assert!(RpcClient::new("not a url").is_err());
  }
}
