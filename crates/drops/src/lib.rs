//! Types for interoperating with thirdweb-style NFT drop contracts over
//! Ethereum JSON-RPC: ether amounts, supply counts, and the ABI of the
//! handful of calls a minting frontend needs.

use {
  alloy_primitives::{address, utils},
  alloy_sol_types::sol,
  serde::{Deserialize, Deserializer, Serialize, Serializer},
  std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
  },
  thiserror::Error,
};

pub use {
  self::{deserialize_from_str::DeserializeFromStr, error::Error, ether::Ether, supply::Supply},
  alloy_primitives::{keccak256, Address, Bytes, TxHash, U256},
  alloy_sol_types::{SolCall, SolInterface},
};

mod deserialize_from_str;
mod error;
mod ether;
mod supply;

pub type Result<T = (), E = Error> = std::result::Result<T, E>;

/// Currency thirdweb uses for "priced in the chain's native token".
pub const NATIVE_TOKEN: Address = address!("EeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");

sol! {
  /// A drop's sale phase.
  #[sol(all_derives)]
  #[derive(Debug, PartialEq, Eq, Hash)]
  struct ClaimCondition {
    uint256 startTimestamp;
    uint256 maxClaimableSupply;
    uint256 supplyClaimed;
    uint256 quantityLimitPerTransaction;
    uint256 waitTimeInSecondsBetweenClaims;
    bytes32 merkleRoot;
    uint256 pricePerToken;
    address currency;
  }

  /// The `DropERC721` functions a minting frontend calls.
  #[sol(all_derives)]
  #[derive(Debug, PartialEq, Eq, Hash)]
  interface IDropERC721 {
    function getActiveClaimConditionId() external view returns (uint256 conditionId);

    function getClaimConditionById(uint256 conditionId)
      external
      view
      returns (ClaimCondition memory condition);

    function nextTokenIdToClaim() external view returns (uint256 tokenId);

    function nextTokenIdToMint() external view returns (uint256 tokenId);

    function claim(
      address receiver,
      uint256 quantity,
      address currency,
      uint256 pricePerToken,
      bytes32[] calldata proofs,
      uint256 proofMaxQuantityPerTransaction
    ) external payable;
  }
}

impl ClaimCondition {
  pub fn is_native(&self) -> bool {
    self.currency == NATIVE_TOKEN
  }

  pub fn price(&self) -> Ether {
    Ether::from_wei(self.pricePerToken)
  }
}
