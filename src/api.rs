//! Response bodies of the JSON API.

use {
  super::*,
  mint::{MintButton, MintState},
};

pub use crate::rpc::TransactionRequest as ClaimTransaction;

/// Claim price, supply, and the mint button as seen by one address.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ClaimState {
  pub price: Option<Ether>,
  pub supply: Option<Supply>,
  pub button: MintButton,
}

impl ClaimState {
  pub fn new(state: &MintState, address: Option<Address>) -> Self {
    Self {
      price: state.price.ready(),
      supply: state.supply.ready(),
      button: state.button(address),
    }
  }
}
